pub mod bucket_list;
pub mod slot_arena;

pub use bucket_list::{BucketList, Ranked};
pub use slot_arena::{SlotArena, SlotId};

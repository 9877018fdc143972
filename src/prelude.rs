pub use crate::adapter::{Completion, CounterPool};
pub use crate::counter::{ConcurrentHitCounter, HitCounter};
pub use crate::ds::{BucketList, SlotArena, SlotId};
pub use crate::error::{ConfigError, InvariantError, TaskError};
pub use crate::merge::merge_top_counts;
pub use crate::traits::{ConcurrentCounter, DomainCounter};

#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::CounterMetricsSnapshot;

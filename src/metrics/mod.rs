//! Observational metrics for the hit counter.
//!
//! Enabled by the `metrics` cargo feature. Recording is split the same way
//! the counter's locking is: write-path counters are plain fields mutated
//! under the exclusive lock, read-path counters are relaxed atomic cells
//! because any number of readers may record at once under the shared lock.

pub mod cell;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;

pub use cell::MetricsCell;
pub use metrics_impl::CounterMetrics;
pub use snapshot::CounterMetricsSnapshot;
pub use traits::{CounterMetricsReadRecorder, CounterMetricsRecorder, MetricsSnapshotProvider};

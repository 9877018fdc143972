//! Recorder and snapshot traits for counter metrics.

/// Write-path recording. Called with the exclusive lock held, so plain
/// fields are enough.
pub trait CounterMetricsRecorder {
    fn record_add_call(&mut self);
    fn record_add_new(&mut self);
    fn record_add_promotion(&mut self);
}

/// Read-path recording. Called with the shared lock held; implementations
/// must tolerate concurrent recorders.
pub trait CounterMetricsReadRecorder {
    fn record_top_call(&self, yielded: u64);
    fn record_top_counts_call(&self, yielded: u64);
    fn record_count_call(&self, found: bool);
}

/// Types that can export their metrics as a plain snapshot.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

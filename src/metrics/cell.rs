use std::sync::atomic::{AtomicU64, Ordering};

/// A metrics-only tally for read paths.
///
/// Read operations run under a shared lock, so several threads may record
/// into the same cell at once. Relaxed ordering suffices: the cells carry
/// no synchronization duty and are only read out into snapshots.
#[repr(transparent)]
#[derive(Debug, Default)]
pub struct MetricsCell(AtomicU64);

impl MetricsCell {
    #[inline]
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn incr(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn add(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_counts_increments() {
        let cell = MetricsCell::new();
        cell.incr();
        cell.incr();
        cell.add(3);
        assert_eq!(cell.get(), 5);
    }

    #[test]
    fn cell_is_shareable_across_threads() {
        use std::sync::Arc;

        let cell = Arc::new(MetricsCell::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cell = Arc::clone(&cell);
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        cell.incr();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cell.get(), 4000);
    }
}

//! Async adapter over the concurrent counter.
//!
//! Mirrors how a service front-end drives the counter: operations are
//! submitted to a fixed pool of worker threads and observed through
//! completion handles. The pool is stateless over the counter; all
//! synchronization stays inside [`ConcurrentHitCounter`].
//!
//! ## Architecture
//!
//! ```text
//!   caller ── add_async("a.com") ──► job channel ──► worker 0 ─┐
//!          ── top_async(5) ───────►              ──► worker 1 ─┼─► RwLock'd
//!          ◄─ Completion<T> ──────  (crossbeam)  ──► worker N ─┘   counter
//! ```
//!
//! Workers default to `std::thread::available_parallelism()`. Each
//! submission carries a one-shot result channel; the returned
//! [`Completion`] can be waited on, polled, or simply dropped. An abandoned
//! handle does not cancel the operation, which is short and runs to
//! completion regardless.
//!
//! Dropping the pool closes the job channel, lets queued jobs finish, and
//! joins every worker.

use std::hash::Hash;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, TryRecvError, bounded, unbounded};

use crate::counter::ConcurrentHitCounter;
use crate::error::{ConfigError, TaskError};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Handle to an operation submitted to a [`CounterPool`].
///
/// The handle is only an observer: dropping it abandons the result but not
/// the operation.
#[derive(Debug)]
pub struct Completion<T> {
    result: Receiver<T>,
}

impl<T> Completion<T> {
    /// Blocks until the operation finishes and returns its result.
    pub fn wait(self) -> Result<T, TaskError> {
        self.result.recv().map_err(|_| TaskError)
    }

    /// Returns the result if the operation already finished, `Ok(None)` if
    /// it is still in flight.
    pub fn try_wait(&self) -> Result<Option<T>, TaskError> {
        match self.result.try_recv() {
            Ok(value) => Ok(Some(value)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(TaskError),
        }
    }
}

/// Fixed worker pool submitting counter operations asynchronously.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use countkit::adapter::CounterPool;
/// use countkit::counter::ConcurrentHitCounter;
///
/// let counter = Arc::new(ConcurrentHitCounter::new());
/// let pool = CounterPool::new(Arc::clone(&counter));
///
/// pool.add_async("a.com".to_string()).wait().unwrap();
/// pool.add_async("a.com".to_string()).wait().unwrap();
///
/// let ranked = pool.top_counts_async(1).wait().unwrap();
/// assert_eq!(ranked, vec![("a.com".to_string(), 2)]);
/// ```
#[derive(Debug)]
pub struct CounterPool<K> {
    counter: Arc<ConcurrentHitCounter<K>>,
    jobs: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl<K> CounterPool<K>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
{
    /// Creates a pool with one worker per hardware execution context.
    pub fn new(counter: Arc<ConcurrentHitCounter<K>>) -> Self {
        let workers = thread::available_parallelism()
            .map(|count| count.get())
            .unwrap_or(1);
        Self::with_workers(counter, workers).expect("hardware worker count is non-zero")
    }

    /// Creates a pool with an explicit worker count.
    ///
    /// `workers == 0` is rejected with a [`ConfigError`].
    pub fn with_workers(
        counter: Arc<ConcurrentHitCounter<K>>,
        workers: usize,
    ) -> Result<Self, ConfigError> {
        if workers == 0 {
            return Err(ConfigError::new("worker count must be greater than zero"));
        }
        let (tx, rx) = unbounded::<Job>();
        let handles = (0..workers)
            .map(|_| {
                let rx = rx.clone();
                thread::spawn(move || {
                    for job in rx.iter() {
                        job();
                    }
                })
            })
            .collect();
        Ok(Self {
            counter,
            jobs: Some(tx),
            workers: handles,
        })
    }

    /// Returns the shared counter behind this pool.
    pub fn counter(&self) -> &Arc<ConcurrentHitCounter<K>> {
        &self.counter
    }

    /// Returns the number of worker threads.
    pub fn workers(&self) -> usize {
        self.workers.len()
    }

    /// Submits one hit for `key`.
    pub fn add_async(&self, key: K) -> Completion<()> {
        self.submit(move |counter| counter.add(key))
    }

    /// Submits a top-K query for up to `n` keys.
    pub fn top_async(&self, n: usize) -> Completion<Vec<K>> {
        self.submit(move |counter| counter.top(n))
    }

    /// Submits a top-K query for up to `n` `(key, count)` pairs.
    pub fn top_counts_async(&self, n: usize) -> Completion<Vec<(K, u64)>> {
        self.submit(move |counter| counter.top_counts(n))
    }

    /// Submits a point lookup for `key`'s current count.
    pub fn count_async(&self, key: K) -> Completion<Option<u64>> {
        self.submit(move |counter| counter.count(&key))
    }

    fn submit<T, F>(&self, task: F) -> Completion<T>
    where
        T: Send + 'static,
        F: FnOnce(&ConcurrentHitCounter<K>) -> T + Send + 'static,
    {
        let (tx, rx) = bounded(1);
        let counter = Arc::clone(&self.counter);
        let job: Job = Box::new(move || {
            // The caller may have dropped its Completion; the operation has
            // already run, so a dead result channel is fine.
            let _ = tx.send(task(&counter));
        });
        self.jobs
            .as_ref()
            .expect("job channel open while the pool exists")
            .send(job)
            .expect("workers outlive the job channel");
        Completion { result: rx }
    }
}

impl<K> Drop for CounterPool<K> {
    fn drop(&mut self) {
        // Closing the channel stops the workers after the queue drains.
        drop(self.jobs.take());
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

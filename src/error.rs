//! Error types for the countkit library.
//!
//! ## Key Components
//!
//! - [`InvariantError`]: Returned when structural invariants of the bucket
//!   list are violated (`check_invariants` methods).
//! - [`ConfigError`]: Returned when adapter configuration parameters are
//!   invalid (e.g. a zero-sized worker pool).
//! - [`TaskError`]: Returned by a completion handle whose worker pool went
//!   away before delivering a result.
//!
//! ## Example Usage
//!
//! ```
//! use std::sync::Arc;
//! use countkit::adapter::CounterPool;
//! use countkit::counter::ConcurrentHitCounter;
//!
//! // Fallible constructor for user-configurable parameters
//! let counter = Arc::new(ConcurrentHitCounter::<String>::new());
//! assert!(CounterPool::with_workers(Arc::clone(&counter), 4).is_ok());
//!
//! // Invalid pool size is caught without panicking
//! assert!(CounterPool::with_workers(counter, 0).is_err());
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal counter invariants are violated.
///
/// Produced by `check_invariants` methods on the bucket list and the façade
/// (e.g. [`HitCounter::check_invariants`](crate::counter::HitCounter::check_invariants)).
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when adapter configuration parameters are invalid.
///
/// Produced by fallible constructors such as
/// [`CounterPool::with_workers`](crate::adapter::CounterPool::with_workers).
/// Carries a human-readable description of which parameter failed validation.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use countkit::adapter::CounterPool;
/// use countkit::counter::ConcurrentHitCounter;
///
/// let counter = Arc::new(ConcurrentHitCounter::<String>::new());
/// let err = CounterPool::with_workers(counter, 0).unwrap_err();
/// assert!(err.to_string().contains("worker"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// TaskError
// ---------------------------------------------------------------------------

/// Error returned when a completion handle cannot deliver its result.
///
/// Surfaces through [`Completion::wait`](crate::adapter::Completion::wait)
/// when the submitting pool's worker dropped the result channel without
/// sending, which only happens if the task itself panicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskError;

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("worker abandoned the task before completing it")
    }
}

impl std::error::Error for TaskError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- InvariantError ---------------------------------------------------

    #[test]
    fn invariant_display_shows_message() {
        let err = InvariantError::new("bucket counts are not strictly increasing");
        assert_eq!(err.to_string(), "bucket counts are not strictly increasing");
    }

    #[test]
    fn invariant_message_accessor() {
        let err = InvariantError::new("test");
        assert_eq!(err.message(), "test");
    }

    #[test]
    fn invariant_clone_and_eq() {
        let a = InvariantError::new("x");
        let b = a.clone();
        assert_eq!(a, b);
    }

    #[test]
    fn invariant_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<InvariantError>();
    }

    // -- ConfigError ------------------------------------------------------

    #[test]
    fn config_display_shows_message() {
        let err = ConfigError::new("worker count must be greater than zero");
        assert_eq!(err.to_string(), "worker count must be greater than zero");
    }

    #[test]
    fn config_debug_includes_message() {
        let err = ConfigError::new("bad pool size");
        let dbg = format!("{:?}", err);
        assert!(dbg.contains("bad pool size"));
    }

    #[test]
    fn config_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<ConfigError>();
    }

    // -- TaskError --------------------------------------------------------

    #[test]
    fn task_display_is_stable() {
        assert!(TaskError.to_string().contains("worker"));
    }

    #[test]
    fn task_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<TaskError>();
    }
}

//! Thread pool construction errors.

/// Errors from building a [`ThreadPool`](crate::ThreadPool).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// A pool must own at least one worker.
    #[error("thread pool needs at least one worker")]
    NoWorkers,
}

//! Error types for cache construction and submission.

use std::io;
use thiserror::Error;

/// Errors that can occur while constructing a cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The worker thread could not be spawned.
    #[error("failed to spawn cache worker thread: {0}")]
    WorkerSpawn(#[from] io::Error),
}

/// Errors returned by submit and flush operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The worker thread has stopped after a fatal error; the cache no
    /// longer accepts work.
    #[error("cache worker has stopped")]
    WorkerStopped,
}

use std::time::Duration;

use thiserror::Error;

// Unified error type for spectral-pool

#[derive(Error, Debug)]
pub enum SnError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("failed to spawn worker {worker}: {reason}")]
    WorkerSpawn { worker: usize, reason: String },
    #[error("channel read failure from worker {worker}: {reason}")]
    ChannelRead { worker: usize, reason: String },
    #[error("worker {worker} crashed after {received} of {expected} results")]
    WorkerCrash {
        worker: usize,
        expected: usize,
        received: usize,
    },
    #[error("gather timed out after {waited:?} with {pending} worker(s) still open")]
    Timeout { waited: Duration, pending: usize },
}

//! spectral-pool: spectral-norm power iteration over a worker pool
//!
//! This crate estimates the spectral norm of the implicit benchmark matrix
//! `A[i][j] = 1 / ((i+j)(i+j+1)/2 + i + 1)` by power iteration on `AᵗA`.
//! Each matrix-vector product is split across concurrent workers that stream
//! partial results back over channels, with serial and rayon executors
//! available behind the same `Executor` trait.

pub mod parallel;

pub mod config;
pub mod core;
pub mod error;
pub mod operator;
pub mod power;
pub mod utils;

// Re-exports for convenience
pub use crate::config::*;
pub use crate::core::*;
pub use error::*;
pub use operator::*;
pub use parallel::{SerialExecutor, UniverseExecutor, WorkerPool};
pub use power::*;
pub use utils::*;

/// Run the full power iteration described by `opts`.
pub fn run(opts: &RunOptions) -> Result<SpectralEstimate, SnError> {
    let executor = UniverseExecutor::from_options(opts.backend, &opts.pool)?;
    PowerIteration::new(executor).run(opts.n)
}

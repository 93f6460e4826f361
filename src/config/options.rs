//! Command-line or API options for a spectral-norm run.
//!
//! This module provides the `PoolOptions` struct, which sizes and bounds the
//! worker pool, and `RunOptions`, which adds the vector dimension and the
//! executor backend. The available backends are the channel-based worker
//! pool, a rayon thread pool, and plain serial evaluation.

use std::str::FromStr;
use std::time::Duration;

use crate::error::SnError;

/// Default capacity (in results) of each worker's outbound channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Default bound on how long gather tolerates silence from every worker.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Executor backend used for every multiply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// Worker threads streaming (index, value) results over channels.
    #[default]
    Pool,
    /// Dedicated rayon thread pool.
    Rayon,
    /// Single-threaded reference evaluation.
    Serial,
}

impl FromStr for BackendKind {
    type Err = SnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pool" => Ok(BackendKind::Pool),
            "rayon" => Ok(BackendKind::Rayon),
            "serial" => Ok(BackendKind::Serial),
            other => Err(SnError::InvalidArgument(format!(
                "unknown backend '{other}' (expected pool, rayon or serial)"
            ))),
        }
    }
}

/// Worker pool sizing and limits.
#[derive(Debug, Clone)]
pub struct PoolOptions {
    /// Requested worker count W; clamped to the vector length per multiply.
    pub workers: usize,

    /// Bounded buffer per worker channel, in results.
    pub channel_capacity: usize,

    /// Longest stretch gather waits without any worker delivering a result
    /// or closing its channel. `None` waits forever.
    pub timeout: Option<Duration>,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            workers: num_cpus::get(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

impl PoolOptions {
    /// Options with `workers` workers and default limits.
    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), SnError> {
        if self.workers == 0 {
            return Err(SnError::InvalidArgument(
                "worker count must be at least 1".to_string(),
            ));
        }
        if self.channel_capacity == 0 {
            return Err(SnError::InvalidArgument(
                "channel capacity must be at least 1".to_string(),
            ));
        }
        if self.timeout == Some(Duration::ZERO) {
            return Err(SnError::InvalidArgument(
                "timeout must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Everything needed for one power-iteration run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Vector dimension.
    pub n: usize,

    /// Which executor performs the multiplies.
    pub backend: BackendKind,

    /// Pool sizing (ignored by the serial backend).
    pub pool: PoolOptions,
}

/// Parse the vector dimension `n`: a positive integer.
pub fn parse_dimension(arg: &str) -> Result<usize, SnError> {
    let trimmed = arg.trim();
    if trimmed.is_empty() {
        return Err(SnError::InvalidArgument(
            "missing vector dimension".to_string(),
        ));
    }
    let value: i128 = trimmed.parse().map_err(|_| {
        SnError::InvalidArgument(format!("'{trimmed}' is not an integer"))
    })?;
    if value <= 0 {
        return Err(SnError::InvalidArgument(format!(
            "vector dimension must be positive, got {value}"
        )));
    }
    usize::try_from(value).map_err(|_| {
        SnError::InvalidArgument(format!("vector dimension {value} is too large"))
    })
}

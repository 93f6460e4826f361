//! Run configuration.

pub mod options;
pub use options::{BackendKind, PoolOptions, RunOptions, parse_dimension};

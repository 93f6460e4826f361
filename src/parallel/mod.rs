use crate::config::{BackendKind, PoolOptions};
use crate::core::traits::Executor;
use crate::error::SnError;
use crate::operator::Transform;

pub mod gather;
pub mod pool;
pub use pool::{PartialResult, RowKernel, WorkerHandle, WorkerPool, WorkerState, WorkerTask};

#[cfg(feature = "rayon")]
pub mod rayon_exec;
#[cfg(feature = "rayon")]
pub use rayon_exec::RayonExecutor;

/// Single-threaded executor; the reference every parallel backend must match.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialExecutor;

impl Executor for SerialExecutor {
    fn workers_for(&self, n: usize) -> usize {
        n.min(1)
    }

    fn apply(&self, transform: Transform, u: &[f64]) -> Result<Vec<f64>, SnError> {
        Ok(transform.apply(u))
    }
}

pub enum UniverseExecutor {
    Serial(SerialExecutor),
    Pool(WorkerPool),
    #[cfg(feature = "rayon")]
    Rayon(RayonExecutor),
}

impl UniverseExecutor {
    pub fn from_options(backend: BackendKind, pool: &PoolOptions) -> Result<Self, SnError> {
        match backend {
            BackendKind::Serial => Ok(UniverseExecutor::Serial(SerialExecutor)),
            BackendKind::Pool => Ok(UniverseExecutor::Pool(WorkerPool::new(pool.clone())?)),
            #[cfg(feature = "rayon")]
            BackendKind::Rayon => Ok(UniverseExecutor::Rayon(RayonExecutor::new(pool.workers)?)),
            #[cfg(not(feature = "rayon"))]
            BackendKind::Rayon => Err(SnError::InvalidArgument(
                "rayon backend not compiled in (enable the `rayon` feature)".to_string(),
            )),
        }
    }
}

impl Executor for UniverseExecutor {
    fn workers_for(&self, n: usize) -> usize {
        match self {
            UniverseExecutor::Serial(exec) => exec.workers_for(n),
            UniverseExecutor::Pool(exec) => exec.workers_for(n),
            #[cfg(feature = "rayon")]
            UniverseExecutor::Rayon(exec) => exec.workers_for(n),
        }
    }

    fn apply(&self, transform: Transform, u: &[f64]) -> Result<Vec<f64>, SnError> {
        match self {
            UniverseExecutor::Serial(exec) => exec.apply(transform, u),
            UniverseExecutor::Pool(exec) => exec.apply(transform, u),
            #[cfg(feature = "rayon")]
            UniverseExecutor::Rayon(exec) => exec.apply(transform, u),
        }
    }
}

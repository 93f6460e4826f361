// rayon-based executor

use rayon::prelude::*;
use tracing::debug;

use crate::core::traits::Executor;
use crate::error::SnError;
use crate::operator::Transform;

pub struct RayonExecutor {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl RayonExecutor {
    pub fn new(workers: usize) -> Result<Self, SnError> {
        if workers == 0 {
            return Err(SnError::InvalidArgument(
                "worker count must be at least 1".to_string(),
            ));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("spectral-rayon-{i}"))
            .build()
            .map_err(|e| SnError::WorkerSpawn {
                worker: 0,
                reason: e.to_string(),
            })?;
        Ok(Self { pool, workers })
    }
}

impl Executor for RayonExecutor {
    fn workers_for(&self, n: usize) -> usize {
        self.workers.min(n)
    }

    fn apply(&self, transform: Transform, u: &[f64]) -> Result<Vec<f64>, SnError> {
        debug!(n = u.len(), workers = self.workers_for(u.len()), "rayon multiply");
        let mut out = vec![0.0; u.len()];
        self.pool.install(|| {
            out.par_iter_mut().enumerate().for_each(|(i, oi)| {
                *oi = transform.row(i, u);
            });
        });
        Ok(out)
    }
}

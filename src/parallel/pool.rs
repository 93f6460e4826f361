//! Channel-based worker pool.
//!
//! One multiply of length `n` is split across `W = min(workers, n)` threads.
//! Worker `k` owns the stride partition `{k, k+W, k+2W, ...}`, evaluates its
//! rows in ascending order, and streams each `(index, value)` pair over its
//! own bounded channel. Dropping the sender when the stride is exhausted is
//! the only completion signal; [`gather`](super::gather) turns the closed
//! channels back into a dense vector and checks that nothing went missing.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, bounded};
use tracing::{debug, trace};

use super::gather;
use crate::config::PoolOptions;
use crate::core::traits::Executor;
use crate::error::SnError;
use crate::operator::Transform;

/// Per-row evaluation run inside each worker: `kernel(i, u)` is output element `i`.
pub type RowKernel = Arc<dyn Fn(usize, &[f64]) -> f64 + Send + Sync>;

/// One output element, produced by exactly one worker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartialResult {
    pub index: usize,
    pub value: f64,
}

/// Stride assignment of worker `worker` out of `workers` over `[0, n)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerTask {
    pub worker: usize,
    pub workers: usize,
    pub n: usize,
}

impl WorkerTask {
    /// Indices owned by this worker, ascending.
    pub fn indices(&self) -> impl Iterator<Item = usize> {
        (self.worker..self.n).step_by(self.workers)
    }

    /// Number of results this worker must deliver: `ceil((n - k) / W)`.
    pub fn expected(&self) -> usize {
        if self.worker >= self.n {
            0
        } else {
            (self.n - self.worker).div_ceil(self.workers)
        }
    }

    pub fn owns(&self, index: usize) -> bool {
        index < self.n && index % self.workers == self.worker
    }
}

/// Lifecycle of a worker as seen by the collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Spawned,
    Running,
    /// Channel closed; exit status not yet reaped.
    Draining,
    Terminated,
}

/// Identity of a running worker plus the receive side of its channel.
pub struct WorkerHandle {
    pub(crate) task: WorkerTask,
    pub(crate) state: WorkerState,
    pub(crate) rx: Receiver<PartialResult>,
    pub(crate) join: Option<JoinHandle<()>>,
    pub(crate) received: usize,
    pub(crate) last_index: Option<usize>,
}

impl WorkerHandle {
    pub fn task(&self) -> WorkerTask {
        self.task
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Results accepted from this worker so far.
    pub fn received(&self) -> usize {
        self.received
    }

    pub(crate) fn transition(&mut self, next: WorkerState) {
        trace!(worker = self.task.worker, from = ?self.state, to = ?next, "worker state");
        self.state = next;
    }
}

/// Pool of short-lived worker threads, re-spawned for every multiply.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    opts: PoolOptions,
}

impl WorkerPool {
    pub fn new(opts: PoolOptions) -> Result<Self, SnError> {
        opts.validate()?;
        Ok(Self { opts })
    }

    pub fn options(&self) -> &PoolOptions {
        &self.opts
    }

    /// Workers actually spawned for a vector of length `n`; never more than `n`.
    pub fn effective_workers(&self, n: usize) -> usize {
        self.opts.workers.min(n)
    }

    /// Launch one worker per stride partition of `u`.
    ///
    /// Each worker holds a shared read-only reference to `u` and its own
    /// sender; the returned handles own the matching receivers. If any
    /// thread fails to start, the workers already launched are abandoned
    /// and `WorkerSpawn` is returned.
    pub fn spawn(&self, u: Arc<[f64]>, kernel: RowKernel) -> Result<Vec<WorkerHandle>, SnError> {
        let n = u.len();
        let workers = self.effective_workers(n);
        let mut handles = Vec::with_capacity(workers);

        for worker in 0..workers {
            let task = WorkerTask { worker, workers, n };
            let (tx, rx) = bounded(self.opts.channel_capacity);
            let mut handle = WorkerHandle {
                task,
                state: WorkerState::Spawned,
                rx,
                join: None,
                received: 0,
                last_index: None,
            };

            let u = Arc::clone(&u);
            let kernel = Arc::clone(&kernel);
            let spawned = thread::Builder::new()
                .name(format!("spectral-worker-{worker}"))
                .spawn(move || run_worker(task, &u, kernel.as_ref(), tx));

            match spawned {
                Ok(join) => {
                    handle.join = Some(join);
                    handle.transition(WorkerState::Running);
                    handles.push(handle);
                }
                Err(e) => {
                    gather::abandon(handles);
                    return Err(SnError::WorkerSpawn {
                        worker,
                        reason: e.to_string(),
                    });
                }
            }
        }
        Ok(handles)
    }

    /// Evaluate `kernel(i, u)` for every `i` in `[0, u.len())` across the pool.
    pub fn map(&self, u: &[f64], kernel: RowKernel) -> Result<Vec<f64>, SnError> {
        let n = u.len();
        debug!(n, workers = self.effective_workers(n), "pool multiply");
        let mut handles = self.spawn(Arc::from(u), kernel)?;
        match gather::collect(&mut handles, n, self.opts.timeout) {
            Ok(out) => {
                gather::reap(handles)?;
                Ok(out)
            }
            Err(e) => {
                gather::abandon(handles);
                Err(e)
            }
        }
    }
}

impl Executor for WorkerPool {
    fn workers_for(&self, n: usize) -> usize {
        self.effective_workers(n)
    }

    fn apply(&self, transform: Transform, u: &[f64]) -> Result<Vec<f64>, SnError> {
        let kernel: RowKernel = Arc::new(move |i: usize, u: &[f64]| transform.row(i, u));
        self.map(u, kernel)
    }
}

fn run_worker(
    task: WorkerTask,
    u: &[f64],
    kernel: &(dyn Fn(usize, &[f64]) -> f64 + Send + Sync),
    tx: Sender<PartialResult>,
) {
    for index in task.indices() {
        let value = kernel(index, u);
        if tx.send(PartialResult { index, value }).is_err() {
            // collector gave up on this multiply
            return;
        }
    }
}

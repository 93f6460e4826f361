//! Fan-in of per-worker result streams into one dense vector.
//!
//! [`collect`] blocks in a single multiplexed wait over every still-open
//! channel, drains whatever is ready, and retires a channel once it reports
//! end-of-stream. A closed channel is only accepted if its worker delivered
//! every index of its stride partition; otherwise the multiply fails with
//! `WorkerCrash` instead of leaving a silent hole in the output.

use std::time::{Duration, Instant};

use crossbeam_channel::{Select, TryRecvError};
use tracing::{trace, warn};

use super::pool::{PartialResult, WorkerHandle, WorkerState};
use crate::error::SnError;

/// Reassemble a length-`n` vector from the workers behind `handles`.
///
/// Returns once every channel has closed with its full quota of results.
/// With `timeout = Some(t)`, gives up with `Timeout` once `t` passes with
/// no open channel delivering a result or closing. Workers that keep
/// streaming are never cut off, however long the multiply takes.
pub fn collect(
    handles: &mut [WorkerHandle],
    n: usize,
    timeout: Option<Duration>,
) -> Result<Vec<f64>, SnError> {
    let mut last_progress = Instant::now();
    let mut out = vec![0.0; n];
    let mut written = vec![false; n];
    let mut active: Vec<usize> = (0..handles.len()).collect();

    while !active.is_empty() {
        let ready = {
            let mut sel = Select::new();
            for &k in &active {
                sel.recv(&handles[k].rx);
            }
            match timeout {
                Some(t) => sel
                    .ready_timeout(t.saturating_sub(last_progress.elapsed()))
                    .is_ok(),
                None => {
                    sel.ready();
                    true
                }
            }
        };
        if !ready {
            return Err(SnError::Timeout {
                waited: last_progress.elapsed(),
                pending: active.len(),
            });
        }

        let mut closed = Vec::new();
        let mut progressed = false;
        for &k in &active {
            let (accepted, done) = drain(&mut handles[k], &mut out, &mut written)?;
            progressed |= accepted > 0 || done;
            if done {
                closed.push(k);
            }
        }
        active.retain(|k| !closed.contains(k));

        if progressed {
            last_progress = Instant::now();
        }
    }

    debug_assert!(written.iter().all(|&w| w));
    Ok(out)
}

/// Read everything currently buffered on one channel.
/// Returns the number of results accepted and whether the channel has closed.
fn drain(
    handle: &mut WorkerHandle,
    out: &mut [f64],
    written: &mut [bool],
) -> Result<(usize, bool), SnError> {
    let mut accepted = 0;
    loop {
        match handle.rx.try_recv() {
            Ok(msg) => {
                accept(handle, msg, out, written)?;
                accepted += 1;
            }
            Err(TryRecvError::Empty) => return Ok((accepted, false)),
            Err(TryRecvError::Disconnected) => {
                let expected = handle.task.expected();
                if handle.received != expected {
                    return Err(SnError::WorkerCrash {
                        worker: handle.task.worker,
                        expected,
                        received: handle.received,
                    });
                }
                handle.transition(WorkerState::Draining);
                return Ok((accepted, true));
            }
        }
    }
}

fn accept(
    handle: &mut WorkerHandle,
    msg: PartialResult,
    out: &mut [f64],
    written: &mut [bool],
) -> Result<(), SnError> {
    let worker = handle.task.worker;
    let PartialResult { index, value } = msg;

    if index >= out.len() {
        return Err(SnError::ChannelRead {
            worker,
            reason: format!("index {index} is beyond the output length {}", out.len()),
        });
    }
    if !handle.task.owns(index) {
        return Err(SnError::ChannelRead {
            worker,
            reason: format!("index {index} is outside this worker's partition"),
        });
    }
    if handle.last_index.is_some_and(|last| index <= last) {
        return Err(SnError::ChannelRead {
            worker,
            reason: format!("index {index} arrived out of order"),
        });
    }
    if written[index] {
        return Err(SnError::ChannelRead {
            worker,
            reason: format!("index {index} written twice"),
        });
    }

    out[index] = value;
    written[index] = true;
    handle.last_index = Some(index);
    handle.received += 1;
    Ok(())
}

/// Wait for every worker to exit. A worker that panicked is reported as
/// `WorkerCrash`; the remaining workers are still joined.
pub fn reap(handles: Vec<WorkerHandle>) -> Result<(), SnError> {
    let mut first_err = None;
    for mut handle in handles {
        if let Some(join) = handle.join.take() {
            if join.join().is_err() && first_err.is_none() {
                first_err = Some(SnError::WorkerCrash {
                    worker: handle.task.worker,
                    expected: handle.task.expected(),
                    received: handle.received,
                });
            }
        }
        handle.transition(WorkerState::Terminated);
    }
    match first_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Tear down a failed multiply.
///
/// Receivers are dropped first so blocked or still-computing workers stop
/// at their next send. Workers that already exited are joined; the rest
/// are detached.
pub fn abandon(handles: Vec<WorkerHandle>) {
    let mut detached = 0;
    for handle in handles {
        let WorkerHandle { task, rx, join, .. } = handle;
        drop(rx);
        match join {
            Some(join) if join.is_finished() => {
                let _ = join.join();
                trace!(worker = task.worker, "worker reaped after abort");
            }
            Some(_) => detached += 1,
            None => {}
        }
    }
    if detached > 0 {
        warn!(detached, "detached workers still running after failed multiply");
    }
}

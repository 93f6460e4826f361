//! Tests for the worker pool and gather: parallel results must equal the
//! serial reference exactly, and broken workers must surface as errors.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use spectral_pool::core::traits::Executor;
use spectral_pool::operator::Transform;
use spectral_pool::parallel::{RowKernel, SerialExecutor, WorkerPool};
use spectral_pool::{PoolOptions, SnError};

fn random_vec(n: usize) -> Vec<f64> {
    let mut rng = rand::thread_rng();
    (0..n).map(|_| rng.r#gen()).collect()
}

/// Every worker count in `[1, n]` reproduces the serial product element for element.
#[test]
fn pool_matches_serial_for_every_width() {
    let n = 23;
    let u = random_vec(n);
    let serial_a = SerialExecutor.apply(Transform::A, &u).unwrap();
    let serial_ata = SerialExecutor.apply_ata(&u).unwrap();

    for workers in 1..=n {
        let pool = WorkerPool::new(PoolOptions::with_workers(workers)).unwrap();
        assert_eq!(pool.workers_for(n), workers);
        assert_eq!(pool.apply(Transform::A, &u).unwrap(), serial_a, "W={workers}");
        assert_eq!(pool.apply_ata(&u).unwrap(), serial_ata, "W={workers}");
    }
}

/// More workers than rows: clamped, same answer.
#[test]
fn oversized_pool_is_clamped() {
    let u = random_vec(3);
    let pool = WorkerPool::new(PoolOptions::with_workers(64)).unwrap();
    assert_eq!(pool.workers_for(3), 3);
    assert_eq!(
        pool.apply(Transform::At, &u).unwrap(),
        SerialExecutor.apply(Transform::At, &u).unwrap()
    );
}

/// A one-slot channel forces workers to block on send; gather still completes.
#[test]
fn tiny_channels_apply_backpressure() {
    let mut opts = PoolOptions::with_workers(4);
    opts.channel_capacity = 1;
    let pool = WorkerPool::new(opts).unwrap();
    let u = random_vec(200);
    assert_eq!(
        pool.apply(Transform::A, &u).unwrap(),
        SerialExecutor.apply(Transform::A, &u).unwrap()
    );
}

/// A worker that dies mid-stride is reported, not silently dropped.
#[test]
fn crashed_worker_is_detected() {
    let pool = WorkerPool::new(PoolOptions::with_workers(2)).unwrap();
    let kernel: RowKernel = Arc::new(|i: usize, _: &[f64]| {
        if i == 5 {
            panic!("worker fault at row {i}");
        }
        i as f64
    });
    let err = pool.map(&[0.0; 10], kernel).unwrap_err();
    match err {
        SnError::WorkerCrash { worker, expected, received } => {
            assert_eq!(worker, 1);
            assert_eq!(expected, 5);
            assert_eq!(received, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

/// A hung worker trips the gather deadline instead of blocking forever.
#[test]
fn hung_worker_times_out() {
    let mut opts = PoolOptions::with_workers(2);
    opts.timeout = Some(Duration::from_millis(50));
    let pool = WorkerPool::new(opts).unwrap();
    let kernel: RowKernel = Arc::new(|i: usize, _: &[f64]| {
        if i == 1 {
            std::thread::sleep(Duration::from_secs(2));
        }
        i as f64
    });
    let err = pool.map(&[0.0; 4], kernel).unwrap_err();
    assert!(matches!(err, SnError::Timeout { pending: 1, .. }), "{err}");
}

/// The timeout bounds silence, not total runtime: workers that keep
/// delivering rows outlive it.
#[test]
fn steady_workers_outlast_the_timeout() {
    let mut opts = PoolOptions::with_workers(2);
    opts.timeout = Some(Duration::from_millis(100));
    let pool = WorkerPool::new(opts).unwrap();
    let kernel: RowKernel = Arc::new(|i: usize, _: &[f64]| {
        std::thread::sleep(Duration::from_millis(20));
        i as f64
    });
    let out = pool.map(&[0.0; 40], kernel).unwrap();
    assert_eq!(out, (0..40).map(|i| i as f64).collect::<Vec<_>>());
}

#[cfg(feature = "rayon")]
#[test]
fn rayon_matches_serial() {
    use spectral_pool::parallel::RayonExecutor;

    let u = random_vec(41);
    let exec = RayonExecutor::new(3).unwrap();
    assert_eq!(exec.workers_for(2), 2);
    assert_eq!(exec.apply_ata(&u).unwrap(), SerialExecutor.apply_ata(&u).unwrap());
}

use criterion::{black_box, Criterion, criterion_group, criterion_main};
use spectral_pool::core::traits::Executor;
use spectral_pool::parallel::{RayonExecutor, SerialExecutor, WorkerPool};
use spectral_pool::PoolOptions;

fn bench_ata_executors(c: &mut Criterion) {
    let n = 1000;
    let u: Vec<f64> = (0..n).map(|i| (i as f64).sin()).collect();
    let workers = num_cpus::get();

    c.bench_function("serial AtA", |ben| {
        ben.iter(|| SerialExecutor.apply_ata(black_box(&u)).unwrap())
    });

    let pool = WorkerPool::new(PoolOptions::with_workers(workers)).unwrap();
    c.bench_function("channel pool AtA", |ben| {
        ben.iter(|| pool.apply_ata(black_box(&u)).unwrap())
    });

    let rayon = RayonExecutor::new(workers).unwrap();
    c.bench_function("rayon AtA", |ben| {
        ben.iter(|| rayon.apply_ata(black_box(&u)).unwrap())
    });
}

criterion_group!(benches, bench_ata_executors);
criterion_main!(benches);

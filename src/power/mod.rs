//! Fixed-count power iteration on `AᵗA`, per the spectral-norm benchmark.
//!
//! Starting from `u = [1; n]`, each round computes `v = AᵗA u` and then
//! `u = AᵗA v`. After [`ITERATIONS`] rounds the Rayleigh quotient
//! `sqrt(uᵗv / vᵗv)` estimates the largest singular value of `A`.

use std::fmt;

use tracing::{debug, info_span};

use crate::core::traits::Executor;
use crate::error::SnError;
use crate::utils::reduce::rayleigh_quotient;

/// Number of `(v, u)` rounds. Tuned for the benchmark, not configurable.
pub const ITERATIONS: usize = 10;

/// Outcome of one run.
#[derive(Clone, Debug, PartialEq)]
pub struct SpectralEstimate {
    pub n: usize,
    pub iterations: usize,
    pub workers: usize,
    pub value: f64,
}

impl fmt::Display for SpectralEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.9}", self.value)
    }
}

pub struct PowerIteration<E> {
    executor: E,
}

impl<E: Executor> PowerIteration<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// One round: returns `(u', v)` with `v = AᵗA u` and `u' = AᵗA v`.
    pub fn step(&self, u: &[f64]) -> Result<(Vec<f64>, Vec<f64>), SnError> {
        let v = self.executor.apply_ata(u)?;
        let u = self.executor.apply_ata(&v)?;
        Ok((u, v))
    }

    /// Run the full iteration for dimension `n`.
    pub fn run(&self, n: usize) -> Result<SpectralEstimate, SnError> {
        if n == 0 {
            return Err(SnError::InvalidArgument(
                "vector dimension must be positive".to_string(),
            ));
        }
        let workers = self.executor.workers_for(n);
        let _span = info_span!("power_iteration", n, workers).entered();

        let (mut u, mut v) = self.step(&vec![1.0; n])?;
        for round in 1..ITERATIONS {
            (u, v) = self.step(&u)?;
            debug!(round, "power iteration round done");
        }

        Ok(SpectralEstimate {
            n,
            iterations: ITERATIONS,
            workers,
            value: rayleigh_quotient(&u, &v),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parallel::SerialExecutor;

    #[test]
    fn scalar_operator_has_unit_norm() {
        let est = PowerIteration::new(SerialExecutor).run(1).unwrap();
        assert_eq!(est.to_string(), "1.000000000");
        assert_eq!(est.iterations, ITERATIONS);
        assert_eq!(est.workers, 1);
    }

    #[test]
    fn run_equals_repeated_steps() {
        let driver = PowerIteration::new(SerialExecutor);
        let mut u = vec![1.0; 6];
        let mut v = Vec::new();
        for _ in 0..ITERATIONS {
            (u, v) = driver.step(&u).unwrap();
        }
        let est = driver.run(6).unwrap();
        assert_eq!(est.value, rayleigh_quotient(&u, &v));
    }

    #[test]
    fn zero_dimension_is_rejected() {
        let err = PowerIteration::new(SerialExecutor).run(0).unwrap_err();
        assert!(matches!(err, SnError::InvalidArgument(_)));
    }

    #[test]
    fn display_uses_nine_digits() {
        let est = SpectralEstimate { n: 2, iterations: 10, workers: 1, value: 1.5 };
        assert_eq!(format!("{est}"), "1.500000000");
    }
}

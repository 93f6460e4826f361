//! Core traits for spectral-pool.

use crate::error::SnError;
use crate::operator::Transform;

/// Anything that can apply the implicit operator to a vector.
pub trait Executor {
    /// Number of concurrent workers a multiply of length `n` would use.
    fn workers_for(&self, n: usize) -> usize;

    /// Compute `transform(u)`; output length equals `u.len()`.
    fn apply(&self, transform: Transform, u: &[f64]) -> Result<Vec<f64>, SnError>;

    /// Compute `Aᵗ A u`.
    fn apply_ata(&self, u: &[f64]) -> Result<Vec<f64>, SnError> {
        let au = self.apply(Transform::A, u)?;
        self.apply(Transform::At, &au)
    }
}

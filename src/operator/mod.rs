//! The implicit operator `A` of the spectral-norm problem.
//!
//! `A` is never materialized: entries come from [`eval_a`] and every product
//! is a row-by-row reduction over the input vector. Each output element is
//! summed in ascending column order, so any partition of the rows across
//! workers reproduces the serial result bit for bit.

/// Entry `A[i][j] = 1 / ((i+j)(i+j+1)/2 + i + 1)`.
#[inline]
pub fn eval_a(i: usize, j: usize) -> f64 {
    let s = (i + j) as f64;
    1.0 / (s * (s + 1.0) / 2.0 + i as f64 + 1.0)
}

/// Which product a multiply computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// `out = A u`
    A,
    /// `out = Aᵗ u`
    At,
}

impl Transform {
    /// Output element `i` of this transform applied to `u`.
    #[inline]
    pub fn row(self, i: usize, u: &[f64]) -> f64 {
        match self {
            Transform::A => u
                .iter()
                .enumerate()
                .fold(0.0, |sum, (j, &uj)| sum + eval_a(i, j) * uj),
            Transform::At => u
                .iter()
                .enumerate()
                .fold(0.0, |sum, (j, &uj)| sum + eval_a(j, i) * uj),
        }
    }

    /// Full product, evaluated serially.
    pub fn apply(self, u: &[f64]) -> Vec<f64> {
        (0..u.len()).map(|i| self.row(i, u)).collect()
    }
}

/// `A u`
pub fn eval_a_times_u(u: &[f64]) -> Vec<f64> {
    Transform::A.apply(u)
}

/// `Aᵗ u`
pub fn eval_at_times_u(u: &[f64]) -> Vec<f64> {
    Transform::At.apply(u)
}

/// `Aᵗ A u`
pub fn eval_ata_times_u(u: &[f64]) -> Vec<f64> {
    eval_at_times_u(&eval_a_times_u(u))
}

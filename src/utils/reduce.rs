//! Vector reductions used to turn the final iterates into a norm estimate.

use num_traits::Float;

/// dot(x, y), summed in index order.
pub fn dot<T: Float>(x: &[T], y: &[T]) -> T {
    assert_eq!(x.len(), y.len(), "dot: length mismatch");
    x.iter()
        .zip(y)
        .fold(T::zero(), |acc, (&xi, &yi)| acc + xi * yi)
}

/// `sqrt(uᵗv / vᵗv)`.
pub fn rayleigh_quotient<T: Float>(u: &[T], v: &[T]) -> T {
    (dot(u, v) / dot(v, v)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn dot_small() {
        assert_eq!(dot(&[1.0, 2.0, 3.0], &[4.0, -5.0, 6.0]), 12.0);
        assert_eq!(dot::<f32>(&[], &[]), 0.0);
    }

    #[test]
    fn quotient_of_scaled_vector() {
        let v = [1.0, 2.0, 2.0];
        let u: Vec<f64> = v.iter().map(|x| 4.0 * x).collect();
        assert_abs_diff_eq!(rayleigh_quotient(&u, &v), 2.0, epsilon = 1e-15);
    }
}

use std::fmt::Debug;

use nalgebra::{DVector, Matrix};

/// A value that can be used as a control point or coefficient of a curve.
///
/// Curves only ever combine their points linearly, so anything that forms a real
/// vector space (plain vectors, affine maps of decision variables, ...) can be used.
pub trait CurvePoint: Clone + Debug {
    /// The additive identity for points of the given dimension.
    fn zero(dim: usize) -> Self;

    /// The output dimension of the point.
    fn dim(&self) -> usize;

    /// Computes `self += k * other`.
    fn add_scaled(&mut self, other: &Self, k: f64);

    /// Computes `self *= k`.
    fn scale(&mut self, k: f64);

    /// A norm of the point.
    fn norm(&self) -> f64;

    /// The norm of the difference of two points.
    fn distance(&self, other: &Self) -> f64 {
        let mut diff = self.clone();
        diff.add_scaled(other, -1.0);
        diff.norm()
    }

    /// Returns true if two points are equal up to `precision`.
    fn is_approx(&self, other: &Self, precision: f64) -> bool;
}

impl CurvePoint for DVector<f64> {
    fn zero(dim: usize) -> Self {
        DVector::zeros(dim)
    }

    fn dim(&self) -> usize {
        self.len()
    }

    #[inline]
    fn add_scaled(&mut self, other: &Self, k: f64) {
        self.axpy(k, other, 1.0);
    }

    #[inline]
    fn scale(&mut self, k: f64) {
        *self *= k;
    }

    fn norm(&self) -> f64 {
        Matrix::norm(self)
    }

    fn distance(&self, other: &Self) -> f64 {
        (self - other).norm()
    }

    /// The difference must not exceed `precision`, scaled by the smaller of the two
    /// magnitudes once that exceeds one.
    fn is_approx(&self, other: &Self, precision: f64) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let scale = f64::max(1.0, f64::min(self.norm(), other.norm()));
        (self - other).norm() <= precision * scale
    }
}

/// Returns true if two sequences of points are equal up to a relative `precision`:
/// `‖a − b‖² ≤ precision² · min(‖a‖², ‖b‖²)`, norms taken over the whole sequence.
pub(crate) fn points_approx_eq<P: CurvePoint>(a: &[P], b: &[P], precision: f64) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let (mut diff, mut norm_a, mut norm_b) = (0.0, 0.0, 0.0);
    for (p, q) in itertools::zip_eq(a, b) {
        if p.dim() != q.dim() {
            return false;
        }
        diff += p.distance(q).powi(2);
        norm_a += p.norm().powi(2);
        norm_b += q.norm().powi(2);
    }
    diff <= precision * precision * f64::min(norm_a, norm_b)
}

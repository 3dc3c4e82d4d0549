use crate::config::APPROX_SAMPLE_STEP;
use crate::error::Result;
use crate::util::Interval;
use super::point::CurvePoint;

/// A curve of arbitrary dimension, defined over a closed time interval.
pub trait Curve {
    /// The type of the points along the curve.
    type Point: CurvePoint;

    /// The type of the derivative curves.
    type Derivative: Curve<Point = Self::Point>;

    /// Evaluates the curve at time `t`.
    fn evaluate(&self, t: f64) -> Result<Self::Point>;

    /// Computes the curve of the `order`-th derivative, over the same time domain.
    ///
    /// An order of zero returns a copy of the curve.
    fn derivative_curve(&self, order: usize) -> Result<Self::Derivative>;

    /// Evaluates the `order`-th derivative at time `t` without building the derivative curve.
    fn derivative_at(&self, t: f64, order: usize) -> Result<Self::Point>;

    /// The dimension of the points along the curve.
    fn dim(&self) -> usize;

    /// The lower bound of the time domain.
    fn t_min(&self) -> f64;

    /// The upper bound of the time domain.
    fn t_max(&self) -> f64;

    /// The polynomial degree of the curve.
    fn degree(&self) -> usize;

    /// The time domain of the curve.
    fn time_range(&self) -> Interval<f64> {
        Interval::new(self.t_min(), self.t_max())
    }

    /// Checks whether two curves are approximately equal.
    ///
    /// The curves must share their domain and dimension. Values, then derivatives up to
    /// `order`, are compared at times spaced [APPROX_SAMPLE_STEP] apart, so curves that only
    /// differ between two samples are reported as equal. Any evaluation error counts as a
    /// difference.
    fn is_approx<C>(&self, other: &C, precision: f64, order: usize) -> bool
    where
        Self: Sized,
        C: Curve<Point = Self::Point> + ?Sized,
    {
        if self.t_min() != other.t_min()
            || self.t_max() != other.t_max()
            || self.dim() != other.dim()
        {
            log::debug!(
                "curves differ in domain or dimension: {:?}/{} vs {:?}/{}",
                self.time_range(),
                self.dim(),
                other.time_range(),
                other.dim()
            );
            return false;
        }

        let matches_at = |t: f64, n: usize| {
            let (lhs, rhs) = if n == 0 {
                (self.evaluate(t), other.evaluate(t))
            } else {
                (self.derivative_at(t, n), other.derivative_at(t, n))
            };
            match (lhs, rhs) {
                (Ok(lhs), Ok(rhs)) => lhs.is_approx(&rhs, precision),
                _ => false,
            }
        };

        (0..=order).all(|n| {
            let mut t = self.t_min();
            while t <= self.t_max() {
                if !matches_at(t, n) {
                    return false;
                }
                t += APPROX_SAMPLE_STEP;
            }
            true
        })
    }

    /// The negation of [Curve::is_approx].
    fn is_not_approx<C>(&self, other: &C, precision: f64, order: usize) -> bool
    where
        Self: Sized,
        C: Curve<Point = Self::Point> + ?Sized,
    {
        !self.is_approx(other, precision, order)
    }
}

impl<C: Curve + ?Sized> Curve for &C {
    type Point = C::Point;
    type Derivative = C::Derivative;

    fn evaluate(&self, t: f64) -> Result<Self::Point> {
        (**self).evaluate(t)
    }

    fn derivative_curve(&self, order: usize) -> Result<Self::Derivative> {
        (**self).derivative_curve(order)
    }

    fn derivative_at(&self, t: f64, order: usize) -> Result<Self::Point> {
        (**self).derivative_at(t, order)
    }

    fn dim(&self) -> usize {
        (**self).dim()
    }

    fn t_min(&self) -> f64 {
        (**self).t_min()
    }

    fn t_max(&self) -> f64 {
        (**self).t_max()
    }

    fn degree(&self) -> usize {
        (**self).degree()
    }
}

//! Dense polynomial curves.

use nalgebra::{DMatrix, DVector, Matrix4, Matrix6, SMatrix};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{Safety, DEFAULT_PRECISION};
use crate::error::{CurveError, Result};
use super::curve::Curve;
use super::point::{points_approx_eq, CurvePoint};

/// A polynomial curve of arbitrary dimension and degree, defined on `[t_min, t_max]`:
///
/// `x(t) = c_0 + c_1 (t - t_min) + ... + c_N (t - t_min)^N`
///
/// The coefficients `c_i` may be plain vectors or any other [CurvePoint], such as affine
/// functions of decision variables.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        try_from = "PolynomialRecord<P>",
        bound(
            serialize = "P: Serialize",
            deserialize = "P: CurvePoint + Deserialize<'de>"
        )
    )
)]
pub struct Polynomial<P = DVector<f64>> {
    /// The dimension of the coefficients.
    dim: usize,
    /// The coefficients, from the constant term up to the highest order term.
    coefficients: Vec<P>,
    /// The degree of the polynomial.
    degree: usize,
    /// Lower bound of the time domain.
    t_min: f64,
    /// Upper bound of the time domain.
    t_max: f64,
    /// Whether inputs are validated.
    safety: Safety,
}

/// The persisted fields of a [Polynomial], validated on the way back in.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct PolynomialRecord<P> {
    dim: usize,
    coefficients: Vec<P>,
    degree: usize,
    t_min: f64,
    t_max: f64,
    #[serde(default)]
    safety: Safety,
}

#[cfg(feature = "serde")]
impl<P: CurvePoint> TryFrom<PolynomialRecord<P>> for Polynomial<P> {
    type Error = CurveError;

    fn try_from(record: PolynomialRecord<P>) -> Result<Self> {
        let curve = Self::assemble(record.coefficients, record.t_min, record.t_max, record.safety)?;
        if curve.safety.is_checked() {
            CurveError::check_dimension(record.dim, curve.dim)?;
            if record.degree != curve.degree {
                return Err(CurveError::InvariantViolation(format!(
                    "stored degree {} does not match {} coefficients",
                    record.degree,
                    curve.coefficients.len()
                )));
            }
        }
        Ok(curve)
    }
}

impl<P> Default for Polynomial<P> {
    /// Creates an empty curve, which cannot be evaluated.
    fn default() -> Self {
        Self {
            dim: 0,
            coefficients: vec![],
            degree: 0,
            t_min: 0.0,
            t_max: 0.0,
            safety: Safety::default(),
        }
    }
}

impl<P: CurvePoint> Polynomial<P> {
    /// Creates a polynomial from its coefficients.
    ///
    /// # Parameters
    /// * `coefficients` - The coefficients, from the constant term up to the highest order.
    ///   The degree of the polynomial is the number of coefficients minus one.
    /// * `t_min` - The lower bound of the time domain
    /// * `t_max` - The upper bound of the time domain
    /// * `safety` - Whether the curve validates its inputs
    pub fn new(coefficients: Vec<P>, t_min: f64, t_max: f64, safety: Safety) -> Result<Self> {
        Self::assemble(coefficients, t_min, t_max, safety)
    }

    /// Creates the degree 1 polynomial going from `init` at `t_min` to `end` at `t_max`.
    ///
    /// Like [Polynomial::new], this accepts a single instant `t_min == t_max` as the domain.
    /// The slope is then zero, which requires `init` and `end` to coincide up to
    /// [DEFAULT_PRECISION]; a checked curve returns an error when they do not.
    pub fn linear(init: &P, end: &P, t_min: f64, t_max: f64, safety: Safety) -> Result<Self> {
        check_same_dimensions(&[init, end])?;
        let mut slope = end.clone();
        slope.add_scaled(init, -1.0);
        if t_max == t_min && slope.norm() <= DEFAULT_PRECISION {
            slope = P::zero(init.dim());
        } else if t_max == t_min && safety.is_checked() {
            return Err(CurveError::InvariantViolation(
                "cannot connect two distinct points over a single instant".into(),
            ));
        } else {
            slope.scale(1.0 / (t_max - t_min));
        }
        Self::assemble(vec![init.clone(), slope], t_min, t_max, safety)
    }

    /// Creates the degree 3 polynomial matching a position and a velocity at both ends.
    ///
    /// # Parameters
    /// * `init`, `d_init` - Position and velocity at `t_min`
    /// * `end`, `d_end` - Position and velocity at `t_max`
    pub fn cubic(
        init: &P,
        d_init: &P,
        end: &P,
        d_end: &P,
        t_min: f64,
        t_max: f64,
        safety: Safety,
    ) -> Result<Self> {
        check_same_dimensions(&[init, end, d_init, d_end])?;
        // [1  0  0   0   ]   [c0]   [ init ]
        // [1  T  T^2 T^3 ] x [c1] = [ end  ]
        // [0  1  0   0   ]   [c2]   [d_init]
        // [0  1  2T  3T^2]   [c3]   [d_end ]
        let w = t_max - t_min;
        #[rustfmt::skip]
        let system = Matrix4::new(
            1.0, 0.0, 0.0,     0.0,
            1.0, w,   w * w,   w * w * w,
            0.0, 1.0, 0.0,     0.0,
            0.0, 1.0, 2.0 * w, 3.0 * w * w,
        );
        let coefficients = solve_boundary_conditions(system, [init, end, d_init, d_end])?;
        log::debug!("fitted cubic of dimension {} on [{}, {}]", init.dim(), t_min, t_max);
        Self::assemble(coefficients, t_min, t_max, safety)
    }

    /// Creates the degree 5 polynomial matching a position, a velocity and an acceleration
    /// at both ends.
    ///
    /// # Parameters
    /// * `init`, `d_init`, `dd_init` - Position, velocity and acceleration at `t_min`
    /// * `end`, `d_end`, `dd_end` - Position, velocity and acceleration at `t_max`
    #[allow(clippy::too_many_arguments)]
    pub fn quintic(
        init: &P,
        d_init: &P,
        dd_init: &P,
        end: &P,
        d_end: &P,
        dd_end: &P,
        t_min: f64,
        t_max: f64,
        safety: Safety,
    ) -> Result<Self> {
        check_same_dimensions(&[init, end, d_init, d_end, dd_init, dd_end])?;
        // Rows: value at 0, value at T, first derivative at 0 and T, second derivative at 0 and T.
        let w = t_max - t_min;
        let (w2, w3, w4, w5) = (w * w, w.powi(3), w.powi(4), w.powi(5));
        #[rustfmt::skip]
        let system = Matrix6::from_row_slice(&[
            1.0, 0.0, 0.0,     0.0,      0.0,       0.0,
            1.0, w,   w2,      w3,       w4,        w5,
            0.0, 1.0, 0.0,     0.0,      0.0,       0.0,
            0.0, 1.0, 2.0 * w, 3.0 * w2, 4.0 * w3,  5.0 * w4,
            0.0, 0.0, 2.0,     0.0,      0.0,       0.0,
            0.0, 0.0, 2.0,     6.0 * w,  12.0 * w2, 20.0 * w3,
        ]);
        let coefficients =
            solve_boundary_conditions(system, [init, end, d_init, d_end, dd_init, dd_end])?;
        log::debug!("fitted quintic of dimension {} on [{}, {}]", init.dim(), t_min, t_max);
        Self::assemble(coefficients, t_min, t_max, safety)
    }

    /// Builds a curve and, if it is checked, validates it.
    fn assemble(coefficients: Vec<P>, t_min: f64, t_max: f64, safety: Safety) -> Result<Self> {
        let first = coefficients.first().ok_or(CurveError::EmptyCurve)?;
        let curve = Self {
            dim: first.dim(),
            degree: coefficients.len() - 1,
            coefficients,
            t_min,
            t_max,
            safety,
        };
        if safety.is_checked() {
            curve.check_invariants()?;
        }
        Ok(curve)
    }

    fn check_invariants(&self) -> Result<()> {
        if !self.time_range().is_ordered() {
            return Err(CurveError::InvariantViolation(format!(
                "t_min ({}) must not exceed t_max ({})",
                self.t_min, self.t_max
            )));
        }
        self.coefficients
            .iter()
            .try_for_each(|c| CurveError::check_dimension(self.dim, c.dim()))
    }

    fn check_if_not_empty(&self) -> Result<()> {
        if self.coefficients.is_empty() {
            Err(CurveError::EmptyCurve)
        } else {
            Ok(())
        }
    }

    fn check_time(&self, t: f64) -> Result<()> {
        if self.safety.is_checked() && !self.time_range().contains(t) {
            Err(CurveError::Domain {
                t,
                t_min: self.t_min,
                t_max: self.t_max,
            })
        } else {
            Ok(())
        }
    }

    /// The coefficients, from the constant term up to the highest order term.
    pub fn coefficients(&self) -> &[P] {
        &self.coefficients
    }

    /// The coefficient of `(t - t_min)^degree`, or `None` beyond the degree of the curve.
    pub fn coeff_at_degree(&self, degree: usize) -> Option<&P> {
        self.coefficients.get(degree)
    }

    /// Whether the curve validates its inputs.
    pub fn safety(&self) -> Safety {
        self.safety
    }

    /// Checks whether two polynomials are approximately equal by comparing their domains,
    /// dimensions and degrees exactly and their coefficients up to a relative `precision`.
    ///
    /// This is both cheaper and stricter than [Curve::is_approx], and equal coefficients
    /// imply equal derivatives of every order.
    pub fn coefficients_approx_eq(&self, other: &Self, precision: f64) -> bool {
        self.t_min == other.t_min
            && self.t_max == other.t_max
            && self.dim == other.dim
            && self.degree == other.degree
            && points_approx_eq(&self.coefficients, &other.coefficients, precision)
    }

    /// Differentiates the coefficients once.
    fn derivative_coefficients(&self) -> Vec<P> {
        if self.coefficients.len() == 1 {
            return vec![P::zero(self.dim)];
        }
        self.coefficients[1..]
            .iter()
            .zip(1..)
            .map(|(c, power)| {
                let mut c = c.clone();
                c.scale(power as f64);
                c
            })
            .collect()
    }
}

impl Polynomial<DVector<f64>> {
    /// Creates a polynomial from a `dim x (degree + 1)` matrix whose column `i` holds the
    /// coefficient of `(t - t_min)^i`.
    pub fn from_matrix(
        coefficients: &DMatrix<f64>,
        t_min: f64,
        t_max: f64,
        safety: Safety,
    ) -> Result<Self> {
        let columns = coefficients.column_iter().map(|c| c.into_owned()).collect();
        Self::assemble(columns, t_min, t_max, safety)
    }

    /// The coefficients as a `dim x (degree + 1)` matrix.
    pub fn coeff(&self) -> DMatrix<f64> {
        if self.coefficients.is_empty() {
            DMatrix::zeros(0, 0)
        } else {
            DMatrix::from_columns(&self.coefficients)
        }
    }
}

impl<P: CurvePoint> Curve for Polynomial<P> {
    type Point = P;
    type Derivative = Polynomial<P>;

    /// Evaluates the polynomial with Horner's scheme.
    fn evaluate(&self, t: f64) -> Result<P> {
        self.check_if_not_empty()?;
        self.check_time(t)?;
        let dt = t - self.t_min;
        let (highest, rest) = self.coefficients.split_last().ok_or(CurveError::EmptyCurve)?;
        let mut h = highest.clone();
        for c in rest.iter().rev() {
            h.scale(dt);
            h.add_scaled(c, 1.0);
        }
        Ok(h)
    }

    fn derivative_curve(&self, order: usize) -> Result<Self> {
        self.check_if_not_empty()?;
        let mut curve = self.clone();
        for step in 0..order {
            log::trace!(
                "differentiating degree {} polynomial (step {} of {})",
                curve.degree,
                step + 1,
                order
            );
            let coefficients = curve.derivative_coefficients();
            curve = Self::assemble(coefficients, self.t_min, self.t_max, self.safety)?;
        }
        Ok(curve)
    }

    fn derivative_at(&self, t: f64, order: usize) -> Result<P> {
        self.check_if_not_empty()?;
        self.check_time(t)?;
        let dt = t - self.t_min;
        let mut point = P::zero(self.dim);
        let mut cdt = 1.0;
        for (i, c) in self.coefficients.iter().enumerate().skip(order) {
            point.add_scaled(c, cdt * falling_factorial(i, order));
            cdt *= dt;
        }
        Ok(point)
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn t_min(&self) -> f64 {
        self.t_min
    }

    fn t_max(&self) -> f64 {
        self.t_max
    }

    fn degree(&self) -> usize {
        self.degree
    }
}

impl<P: CurvePoint> PartialEq for Polynomial<P> {
    fn eq(&self, other: &Self) -> bool {
        self.coefficients_approx_eq(other, DEFAULT_PRECISION)
    }
}

/// Computes `n (n - 1) ... (n - k + 1)`.
fn falling_factorial(n: usize, k: usize) -> f64 {
    (0..k).map(|i| (n - i) as f64).product()
}

fn check_same_dimensions<P: CurvePoint>(points: &[&P]) -> Result<()> {
    let dim = points.first().map_or(0, |p| p.dim());
    points
        .iter()
        .try_for_each(|p| CurveError::check_dimension(dim, p.dim()))
}

/// Solves `system * coefficients = conditions` for the coefficients of a polynomial.
///
/// Each coefficient is the combination of the boundary conditions given by a row of the
/// inverse system, which amounts to solving the system independently for every dimension.
fn solve_boundary_conditions<P: CurvePoint, const N: usize>(
    system: SMatrix<f64, N, N>,
    conditions: [&P; N],
) -> Result<Vec<P>> {
    let inverse = system.try_inverse().ok_or_else(|| {
        log::warn!("singular boundary condition system: {:?}", system);
        CurveError::InvariantViolation("boundary condition system is singular".into())
    })?;
    let dim = conditions[0].dim();
    Ok((0..N)
        .map(|row| {
            let mut coefficient = P::zero(dim);
            for (col, condition) in conditions.iter().enumerate() {
                coefficient.add_scaled(condition, inverse[(row, col)]);
            }
            coefficient
        })
        .collect())
}

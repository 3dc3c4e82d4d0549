//! Affine functions of decision variables, used as symbolic curve points.

use std::borrow::Cow;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use nalgebra::{DMatrix, DVector};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{CurveError, Result};
use super::point::CurvePoint;
use super::polynomial::Polynomial;
use super::curve::Curve;

/// A point whose value depends linearly on a vector of decision variables `x`:
/// `value(x) = B x + c`.
///
/// The zero variant is the additive identity. It is absorbed by addition and subtraction,
/// whatever the shape of the other operand.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(into = "LinearVariableRecord", try_from = "LinearVariableRecord")
)]
pub enum LinearVariable {
    /// The zero element of the given output dimension.
    Zero { dim: usize },
    /// The affine map `B x + c`.
    Affine { b: DMatrix<f64>, c: DVector<f64> },
}

/// The persisted fields of a [LinearVariable].
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct LinearVariableRecord {
    b: DMatrix<f64>,
    c: DVector<f64>,
    zero: bool,
}

#[cfg(feature = "serde")]
impl From<LinearVariable> for LinearVariableRecord {
    fn from(var: LinearVariable) -> Self {
        Self {
            b: var.b().into_owned(),
            c: var.c().into_owned(),
            zero: var.is_zero(),
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<LinearVariableRecord> for LinearVariable {
    type Error = CurveError;

    fn try_from(record: LinearVariableRecord) -> Result<Self> {
        if record.zero {
            Ok(LinearVariable::zero(record.c.len()))
        } else {
            LinearVariable::new(record.b, record.c)
        }
    }
}

impl Default for LinearVariable {
    fn default() -> Self {
        LinearVariable::zero(0)
    }
}

impl LinearVariable {
    /// Creates the affine map `B x + c`.
    pub fn new(b: DMatrix<f64>, c: DVector<f64>) -> Result<Self> {
        CurveError::check_dimension(c.len(), b.nrows())?;
        Ok(LinearVariable::Affine { b, c })
    }

    /// Creates a constant point, independent of the `num_variables` decision variables.
    pub fn constant(c: DVector<f64>, num_variables: usize) -> Self {
        LinearVariable::Affine {
            b: DMatrix::zeros(c.len(), num_variables),
            c,
        }
    }

    /// The zero element for points of dimension `dim`.
    pub const fn zero(dim: usize) -> Self {
        LinearVariable::Zero { dim }
    }

    /// Returns true for the zero element.
    pub fn is_zero(&self) -> bool {
        matches!(self, LinearVariable::Zero { .. })
    }

    /// The matrix `B`. The zero element reports the identity matrix of its dimension.
    pub fn b(&self) -> Cow<'_, DMatrix<f64>> {
        match self {
            LinearVariable::Zero { dim } => Cow::Owned(DMatrix::identity(*dim, *dim)),
            LinearVariable::Affine { b, .. } => Cow::Borrowed(b),
        }
    }

    /// The vector `c`. The zero element reports the zero vector of its dimension.
    pub fn c(&self) -> Cow<'_, DVector<f64>> {
        match self {
            LinearVariable::Zero { dim } => Cow::Owned(DVector::zeros(*dim)),
            LinearVariable::Affine { c, .. } => Cow::Borrowed(c),
        }
    }

    /// The output dimension of the variable.
    pub fn dim(&self) -> usize {
        match self {
            LinearVariable::Zero { dim } => *dim,
            LinearVariable::Affine { c, .. } => c.len(),
        }
    }

    /// The number of decision variables the point depends on.
    pub fn num_variables(&self) -> usize {
        match self {
            LinearVariable::Zero { .. } => 0,
            LinearVariable::Affine { b, .. } => b.ncols(),
        }
    }

    /// The storage size of the variable: zero for the zero element, otherwise the larger of
    /// the number of variables and the output dimension.
    pub fn size(&self) -> usize {
        match self {
            LinearVariable::Zero { .. } => 0,
            LinearVariable::Affine { b, c } => usize::max(b.ncols(), c.len()),
        }
    }

    /// Evaluates the point for the decision variables `x`.
    ///
    /// The zero element evaluates to the zero vector whatever `x` is.
    pub fn evaluate(&self, x: &DVector<f64>) -> Result<DVector<f64>> {
        if let LinearVariable::Affine { b, .. } = self {
            CurveError::check_dimension(b.ncols(), x.len())?;
        }
        Ok(self.evaluate_unchecked(x))
    }

    /// Evaluates the point without checking the size of `x`.
    ///
    /// # Panics
    /// If `x` does not have one entry per decision variable.
    pub fn evaluate_unchecked(&self, x: &DVector<f64>) -> DVector<f64> {
        match self {
            LinearVariable::Zero { dim } => DVector::zeros(*dim),
            LinearVariable::Affine { b, c } => b * x + c,
        }
    }

    /// An upper bound style norm, `‖B‖ + ‖c‖`, rather than an induced operator norm.
    pub fn norm(&self) -> f64 {
        match self {
            LinearVariable::Zero { .. } => 0.0,
            LinearVariable::Affine { b, c } => b.norm() + c.norm(),
        }
    }

    /// The norm of `self − other`, or infinity when the two variables differ in shape.
    pub fn distance(&self, other: &Self) -> f64 {
        if self.dim() != other.dim() {
            return f64::INFINITY;
        }
        self.checked_sub(other).map_or(f64::INFINITY, |diff| diff.norm())
    }

    /// Returns true if `‖self − other‖ < precision`. Variables of different shapes are
    /// never approximately equal.
    pub fn is_approx(&self, other: &Self, precision: f64) -> bool {
        self.distance(other) < precision
    }

    /// Adds two variables, failing instead of panicking when their shapes differ.
    pub fn checked_add(&self, other: &Self) -> Result<Self> {
        self.check_same_shape(other)?;
        Ok(self.clone() + other)
    }

    /// Subtracts two variables, failing instead of panicking when their shapes differ.
    pub fn checked_sub(&self, other: &Self) -> Result<Self> {
        self.check_same_shape(other)?;
        Ok(self.clone() - other)
    }

    fn check_same_shape(&self, other: &Self) -> Result<()> {
        if let (LinearVariable::Affine { b: b1, c: c1 }, LinearVariable::Affine { b: b2, c: c2 }) =
            (self, other)
        {
            CurveError::check_dimension(c1.len(), c2.len())?;
            CurveError::check_dimension(b1.nrows(), b2.nrows())?;
            CurveError::check_dimension(b1.ncols(), b2.ncols())?;
        }
        Ok(())
    }
}

impl AddAssign<&LinearVariable> for LinearVariable {
    /// # Panics
    /// If both operands are non-zero and differ in shape.
    fn add_assign(&mut self, rhs: &LinearVariable) {
        if let LinearVariable::Affine { b: rb, c: rc } = rhs {
            match self {
                LinearVariable::Zero { .. } => *self = rhs.clone(),
                LinearVariable::Affine { b, c } => {
                    *b += rb;
                    *c += rc;
                }
            }
        }
    }
}

impl SubAssign<&LinearVariable> for LinearVariable {
    /// # Panics
    /// If both operands are non-zero and differ in shape.
    fn sub_assign(&mut self, rhs: &LinearVariable) {
        if let LinearVariable::Affine { b: rb, c: rc } = rhs {
            match self {
                LinearVariable::Zero { .. } => *self = -rhs.clone(),
                LinearVariable::Affine { b, c } => {
                    *b -= rb;
                    *c -= rc;
                }
            }
        }
    }
}

impl AddAssign for LinearVariable {
    fn add_assign(&mut self, rhs: LinearVariable) {
        *self += &rhs;
    }
}

impl SubAssign for LinearVariable {
    fn sub_assign(&mut self, rhs: LinearVariable) {
        *self -= &rhs;
    }
}

impl MulAssign<f64> for LinearVariable {
    fn mul_assign(&mut self, k: f64) {
        if let LinearVariable::Affine { b, c } = self {
            *b *= k;
            *c *= k;
        }
    }
}

impl DivAssign<f64> for LinearVariable {
    fn div_assign(&mut self, k: f64) {
        if let LinearVariable::Affine { b, c } = self {
            *b /= k;
            *c /= k;
        }
    }
}

impl Add<&LinearVariable> for LinearVariable {
    type Output = LinearVariable;

    fn add(mut self, rhs: &LinearVariable) -> LinearVariable {
        self += rhs;
        self
    }
}

impl Add for LinearVariable {
    type Output = LinearVariable;

    fn add(mut self, rhs: LinearVariable) -> LinearVariable {
        self += &rhs;
        self
    }
}

impl Sub<&LinearVariable> for LinearVariable {
    type Output = LinearVariable;

    fn sub(mut self, rhs: &LinearVariable) -> LinearVariable {
        self -= rhs;
        self
    }
}

impl Sub for LinearVariable {
    type Output = LinearVariable;

    fn sub(mut self, rhs: LinearVariable) -> LinearVariable {
        self -= &rhs;
        self
    }
}

impl Neg for LinearVariable {
    type Output = LinearVariable;

    fn neg(self) -> LinearVariable {
        match self {
            LinearVariable::Zero { dim } => LinearVariable::Zero { dim },
            LinearVariable::Affine { b, c } => LinearVariable::Affine { b: -b, c: -c },
        }
    }
}

impl Mul<f64> for LinearVariable {
    type Output = LinearVariable;

    fn mul(mut self, k: f64) -> LinearVariable {
        self *= k;
        self
    }
}

impl Mul<LinearVariable> for f64 {
    type Output = LinearVariable;

    fn mul(self, var: LinearVariable) -> LinearVariable {
        var * self
    }
}

impl Div<f64> for LinearVariable {
    type Output = LinearVariable;

    fn div(mut self, k: f64) -> LinearVariable {
        self /= k;
        self
    }
}

impl CurvePoint for LinearVariable {
    fn zero(dim: usize) -> Self {
        LinearVariable::zero(dim)
    }

    fn dim(&self) -> usize {
        LinearVariable::dim(self)
    }

    fn add_scaled(&mut self, other: &Self, k: f64) {
        *self += other.clone() * k;
    }

    fn scale(&mut self, k: f64) {
        *self *= k;
    }

    fn norm(&self) -> f64 {
        LinearVariable::norm(self)
    }

    fn distance(&self, other: &Self) -> f64 {
        LinearVariable::distance(self, other)
    }

    fn is_approx(&self, other: &Self, precision: f64) -> bool {
        LinearVariable::is_approx(self, other, precision)
    }
}

/// Substitutes concrete decision variables into a symbolic curve.
pub trait Specialize {
    /// The numeric counterpart of the curve.
    type Output;

    /// Evaluates every control point of the curve at `x`, producing a curve of the same kind
    /// over the same time domain.
    fn specialize(&self, x: &DVector<f64>) -> Result<Self::Output>;
}

impl Specialize for Polynomial<LinearVariable> {
    type Output = Polynomial<DVector<f64>>;

    fn specialize(&self, x: &DVector<f64>) -> Result<Self::Output> {
        let safety = self.safety();
        let coefficients = self
            .coefficients()
            .iter()
            .map(|var| {
                if safety.is_checked() {
                    var.evaluate(x)
                } else {
                    Ok(var.evaluate_unchecked(x))
                }
            })
            .collect::<Result<Vec<_>>>()?;
        Polynomial::new(coefficients, self.t_min(), self.t_max(), safety)
    }
}

/// Specialises a symbolic curve once its decision variables `x` are known.
pub fn evaluate_linear<C: Specialize>(curve: &C, x: &DVector<f64>) -> Result<C::Output> {
    curve.specialize(x)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::Safety;
    use assert_approx_eq::assert_approx_eq;
    use rand::{Rng, SeedableRng};

    fn random_variable(rng: &mut impl Rng, dim: usize, num_variables: usize) -> LinearVariable {
        let b = DMatrix::from_fn(dim, num_variables, |_, _| rng.gen_range(-5.0..5.0));
        let c = DVector::from_fn(dim, |_, _| rng.gen_range(-5.0..5.0));
        LinearVariable::new(b, c).unwrap()
    }

    #[test]
    fn affine_evaluation() {
        let var = LinearVariable::new(
            DMatrix::from_row_slice(2, 3, &[1.0, 0.0, 2.0, 0.0, 1.0, -1.0]),
            DVector::from_vec(vec![1.0, 1.0]),
        )
        .unwrap();
        let x = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        assert_eq!(var.evaluate(&x).unwrap(), DVector::from_vec(vec![8.0, 0.0]));
        assert_eq!(
            var.evaluate(&DVector::zeros(2)),
            Err(CurveError::Dimension { expected: 3, found: 2 })
        );
        assert_eq!(var.num_variables(), 3);
        assert_eq!(var.size(), 3);
        assert_eq!(CurvePoint::dim(&var), 2);
    }

    #[test]
    fn malformed_affine() {
        assert_eq!(
            LinearVariable::new(DMatrix::zeros(3, 2), DVector::zeros(2)),
            Err(CurveError::Dimension { expected: 2, found: 3 })
        );
    }

    #[test]
    fn zero_element() {
        let zero = LinearVariable::zero(3);
        assert!(zero.is_zero());
        assert_eq!(zero.size(), 0);
        assert_eq!(zero.norm(), 0.0);
        assert_eq!(*zero.b(), DMatrix::identity(3, 3));
        assert_eq!(*zero.c(), DVector::zeros(3));
        let x = DVector::from_vec(vec![4.0, -2.0, 7.0]);
        assert_eq!(zero.evaluate(&x).unwrap(), DVector::zeros(3));
        // The size of x is irrelevant to the zero element.
        assert_eq!(zero.evaluate(&DVector::zeros(5)).unwrap(), DVector::zeros(3));
        assert_eq!(LinearVariable::default(), LinearVariable::zero(0));
        assert!((zero.clone() * 4.0).is_zero());
        assert!((-zero / 2.0).is_zero());
    }

    #[test]
    fn zero_is_absorbed() {
        let mut rng = rand::rngs::StdRng::from_seed(*b"Vegemite sandwhich is not fun...");
        let a = random_variable(&mut rng, 3, 4);
        assert_eq!(LinearVariable::zero(3) + &a, a);
        assert_eq!(a.clone() + LinearVariable::zero(3), a);
        assert_eq!(a.clone() - LinearVariable::zero(7), a);
        assert_eq!(LinearVariable::zero(3) - &a, -a.clone());
        assert!(LinearVariable::zero(3).checked_add(&a).is_ok());
    }

    #[test]
    fn group_laws() {
        let mut rng = rand::rngs::StdRng::from_seed(*b"Vegemite sandwhich is not fun...");
        for _ in 0..50 {
            let a = random_variable(&mut rng, 3, 4);
            let b = random_variable(&mut rng, 3, 4);
            let k = rng.gen_range(-3.0..3.0);
            assert!(((a.clone() + &b) - &b).is_approx(&a, 1e-10));
            assert!((k * (a.clone() + &b)).is_approx(&(k * a.clone() + k * b.clone()), 1e-10));
            assert!(((a.clone() * k) / k).is_approx(&a, 1e-10));
            assert!(!(a.clone() + &b).is_approx(&a, 1e-10));
        }
    }

    #[test]
    fn evaluation_is_linear() {
        let mut rng = rand::rngs::StdRng::from_seed(*b"Vegemite sandwhich is not fun...");
        let a = random_variable(&mut rng, 2, 3);
        let b = random_variable(&mut rng, 2, 3);
        let x = DVector::from_vec(vec![0.5, -1.0, 2.0]);
        let sum = (a.clone() + &b).evaluate(&x).unwrap();
        let expected = a.evaluate(&x).unwrap() + b.evaluate(&x).unwrap();
        assert_approx_eq!((sum - expected).norm(), 0.0, 1e-10);
    }

    #[test]
    fn norm_is_sum_of_parts() {
        let var =
            LinearVariable::new(DMatrix::from_element(1, 1, 3.0), DVector::from_vec(vec![4.0]))
                .unwrap();
        assert_approx_eq!(var.norm(), 7.0);
        let constant = LinearVariable::constant(DVector::from_vec(vec![1.0, 2.0]), 5);
        assert_eq!(constant.b().shape(), (2, 5));
        assert_eq!(
            constant.evaluate(&DVector::from_element(5, 9.0)).unwrap(),
            DVector::from_vec(vec![1.0, 2.0])
        );
    }

    #[test]
    fn mismatched_shapes() {
        let a = LinearVariable::constant(DVector::zeros(2), 3);
        let b = LinearVariable::constant(DVector::zeros(2), 4);
        assert_eq!(a.checked_add(&b), Err(CurveError::Dimension { expected: 3, found: 4 }));
        assert!(a.checked_sub(&LinearVariable::constant(DVector::zeros(3), 3)).is_err());
        assert!(a.checked_sub(&a).is_ok());
    }

    #[test]
    fn mismatched_shapes_are_not_approx() {
        let a = LinearVariable::constant(DVector::zeros(2), 3);
        let b = LinearVariable::constant(DVector::zeros(2), 4);
        assert!(!a.is_approx(&b, 1e-9));
        assert!(!b.is_approx(&a, 1e-9));
        assert_eq!(a.distance(&b), f64::INFINITY);
        assert!(!a.is_approx(&LinearVariable::zero(3), 1.0));
        assert!(a.is_approx(&LinearVariable::zero(2), 1e-9));

        let curve = |v: &LinearVariable| {
            Polynomial::new(vec![v.clone()], 0.0, 1.0, Safety::Checked).unwrap()
        };
        assert!(curve(&a) != curve(&b));
        assert!(curve(&a) == curve(&a));
        assert!(!curve(&a).is_approx(&curve(&b), 1e-9, 2));
    }

    #[test]
    fn specialize_polynomial() {
        let mut rng = rand::rngs::StdRng::from_seed(*b"Vegemite sandwhich is not fun...");
        let coefficients: Vec<LinearVariable> =
            (0..4).map(|_| random_variable(&mut rng, 2, 3)).collect();
        let curve = Polynomial::new(coefficients, 0.0, 2.0, Safety::Checked).unwrap();
        let x = DVector::from_vec(vec![1.0, -0.5, 0.25]);
        let numeric = evaluate_linear(&curve, &x).unwrap();
        assert_eq!(numeric.degree(), 3);
        assert_eq!(numeric.time_range(), curve.time_range());
        for i in 0..=10 {
            let t = 0.2 * i as f64;
            let symbolic = curve.evaluate(t).unwrap().evaluate(&x).unwrap();
            assert_approx_eq!((numeric.evaluate(t).unwrap() - symbolic).norm(), 0.0, 1e-9);
        }
        assert!(matches!(
            curve.specialize(&DVector::zeros(2)),
            Err(CurveError::Dimension { expected: 3, found: 2 })
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn persisted_fields() {
        let var = LinearVariable::constant(DVector::from_vec(vec![1.0, 2.0]), 2);
        let json = serde_json::to_value(&var).unwrap();
        for field in ["b", "c", "zero"] {
            assert!(json.get(field).is_some(), "missing field {}", field);
        }
        assert_eq!(serde_json::from_value::<LinearVariable>(json).unwrap(), var);

        let zero = LinearVariable::zero(4);
        let json = serde_json::to_value(&zero).unwrap();
        assert_eq!(json["zero"], serde_json::json!(true));
        assert_eq!(serde_json::from_value::<LinearVariable>(json).unwrap(), zero);
    }
}

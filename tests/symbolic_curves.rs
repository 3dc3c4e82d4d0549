//! Tests that build curves over affine decision variables and specialise them.

use polycurve::math::evaluate_linear;
use polycurve::nalgebra::{DMatrix, DVector};
use polycurve::{Curve, CurveError, LinearVariable, Polynomial, Safety, Specialize};

/// The point `x[offset..offset + dim]` of a vector of `num_variables` decision variables.
fn select(dim: usize, num_variables: usize, offset: usize) -> LinearVariable {
    let b = DMatrix::from_fn(dim, num_variables, |i, j| if j == offset + i { 1.0 } else { 0.0 });
    LinearVariable::new(b, DVector::zeros(dim)).unwrap()
}

/// A cubic whose end position is a decision variable specialises to the numeric cubic.
#[test_log::test]
fn symbolic_cubic_matches_numeric_cubic() {
    let init = LinearVariable::constant(DVector::from_vec(vec![0.0, 0.0]), 2);
    let d_init = LinearVariable::zero(2);
    let end = select(2, 2, 0);
    let d_end = LinearVariable::zero(2);
    let symbolic =
        Polynomial::cubic(&init, &d_init, &end, &d_end, 0.0, 2.0, Safety::Checked).unwrap();
    assert_eq!(symbolic.dim(), 2);

    let x = DVector::from_vec(vec![3.0, -1.0]);
    let numeric = symbolic.specialize(&x).unwrap();
    let expected = Polynomial::cubic(
        &DVector::zeros(2),
        &DVector::zeros(2),
        &x,
        &DVector::zeros(2),
        0.0,
        2.0,
        Safety::Checked,
    )
    .unwrap();
    assert!(numeric.coefficients_approx_eq(&expected, 1e-12));
    assert!((numeric.evaluate(2.0).unwrap() - &x).norm() < 1e-12);
}

/// Evaluating then specialising gives the same points as specialising then evaluating.
#[test]
fn specialisation_commutes_with_evaluation() {
    let coefficients = vec![select(3, 9, 0), select(3, 9, 3), select(3, 9, 6)];
    let symbolic = Polynomial::new(coefficients, -1.0, 1.0, Safety::Checked).unwrap();
    let x = DVector::from_fn(9, |i, _| i as f64 - 4.0);
    let numeric = evaluate_linear(&symbolic, &x).unwrap();
    for i in 0..=8 {
        let t = -1.0 + 0.25 * i as f64;
        let lhs = numeric.evaluate(t).unwrap();
        let rhs = symbolic.evaluate(t).unwrap().evaluate(&x).unwrap();
        assert!((lhs - rhs).norm() < 1e-12);
        let lhs = numeric.derivative_at(t, 1).unwrap();
        let rhs = symbolic.derivative_at(t, 1).unwrap().evaluate(&x).unwrap();
        assert!((lhs - rhs).norm() < 1e-12);
    }
}

/// A symbolic derivative beyond the degree is the zero element.
#[test]
fn symbolic_derivatives() {
    let (init, end) = (select(2, 4, 0), select(2, 4, 2));
    let symbolic = Polynomial::linear(&init, &end, 0.0, 1.0, Safety::Checked).unwrap();
    assert!(symbolic.derivative_at(0.5, 2).unwrap().is_zero());
    let slope = symbolic.derivative_curve(1).unwrap();
    assert_eq!(slope.degree(), 0);
    let x = DVector::from_vec(vec![1.0, 1.0, 4.0, 5.0]);
    assert_eq!(
        slope.evaluate(0.0).unwrap().evaluate(&x).unwrap(),
        DVector::from_vec(vec![3.0, 4.0])
    );
    assert!(symbolic.derivative_curve(2).unwrap().evaluate(0.3).unwrap().is_zero());
}

/// The zero element evaluates to the zero vector for any assignment of the variables.
#[test]
fn zero_evaluates_to_zero() {
    let zero = LinearVariable::zero(3);
    for x in [DVector::from_vec(vec![1.0, 2.0, 3.0]), DVector::from_vec(vec![-7.0, 0.0, 1e9])] {
        assert_eq!(zero.evaluate(&x).unwrap(), DVector::zeros(3));
    }
    let a = select(3, 3, 0);
    assert_eq!(LinearVariable::zero(3) + &a, a);
}

/// Checked symbolic curves reject assignments of the wrong size, unchecked ones trust them.
#[test]
fn specialisation_checks_variables() {
    let coefficients = vec![select(1, 2, 0), select(1, 2, 1)];
    let checked = Polynomial::new(coefficients.clone(), 0.0, 1.0, Safety::Checked).unwrap();
    assert_eq!(
        checked.specialize(&DVector::zeros(3)).unwrap_err(),
        CurveError::Dimension { expected: 2, found: 3 }
    );
    let unchecked = Polynomial::new(coefficients, 0.0, 1.0, Safety::Unchecked).unwrap();
    let numeric = unchecked.specialize(&DVector::from_vec(vec![1.0, 2.0])).unwrap();
    assert_eq!(numeric.safety(), Safety::Unchecked);
    assert!((numeric.evaluate(2.0).unwrap()[0] - 5.0).abs() < 1e-12);
}

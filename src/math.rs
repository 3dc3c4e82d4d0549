//! Curves and the points they are made of.

pub use curve::Curve;
pub use linear_variable::{evaluate_linear, LinearVariable, Specialize};
pub use point::CurvePoint;
pub use polynomial::Polynomial;

mod curve;
mod linear_variable;
mod point;
mod polynomial;

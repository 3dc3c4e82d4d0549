//! Time-parameterised curves of arbitrary dimension for trajectory generation.
//!
//! Curves are evaluated, differentiated and compared through the [Curve] trait. The
//! [Polynomial] curve can be built from raw coefficients or from boundary conditions, and
//! its coefficients may be plain vectors or [LinearVariable]s, affine functions of decision
//! variables that are only known once an optimisation problem has been solved. Such symbolic
//! curves are turned into numeric ones with [Specialize].
//!
//! ```
//! use polycurve::nalgebra::DVector;
//! use polycurve::{Curve, Polynomial, Safety};
//!
//! let curve = Polynomial::cubic(
//!     &DVector::from_vec(vec![0.0]),
//!     &DVector::from_vec(vec![1.0]),
//!     &DVector::from_vec(vec![1.0]),
//!     &DVector::from_vec(vec![1.0]),
//!     0.0,
//!     1.0,
//!     Safety::Checked,
//! )
//! .unwrap();
//! assert_eq!(curve.evaluate(0.0).unwrap()[0], 0.0);
//! assert!(curve.evaluate(1.5).is_err());
//! ```

pub use nalgebra;
pub use config::Safety;
pub use error::{CurveError, Result};
pub use math::{Curve, CurvePoint, LinearVariable, Polynomial, Specialize};
pub use util::Interval;

pub mod config;
mod error;
pub mod math;
mod util;

//! Error types.

use thiserror::Error;

/// Result type alias using [CurveError].
pub type Result<T> = std::result::Result<T, CurveError>;

/// Errors raised when building or querying curves and affine variables.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// A time argument lies outside of the curve's domain.
    #[error("time {t} is outside of the curve domain [{t_min}, {t_max}]")]
    Domain {
        /// The requested time
        t: f64,
        /// Lower bound of the domain
        t_min: f64,
        /// Upper bound of the domain
        t_max: f64,
    },

    /// Two vectors or matrices that must agree in size do not.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    Dimension {
        /// The expected size
        expected: usize,
        /// The size that was supplied
        found: usize,
    },

    /// The curve has no coefficients.
    #[error("curve has no coefficients")]
    EmptyCurve,

    /// A curve was built from malformed parameters.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

impl CurveError {
    /// Returns a [CurveError::Dimension] error unless `expected == found`.
    pub(crate) fn check_dimension(expected: usize, found: usize) -> Result<()> {
        if expected == found {
            Ok(())
        } else {
            Err(CurveError::Dimension { expected, found })
        }
    }
}

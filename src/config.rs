//! Evaluation policy and tolerances.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::CurveError;

/// Default precision of approximate comparisons.
pub const DEFAULT_PRECISION: f64 = 1e-12;

/// Default highest derivative order checked by [crate::math::Curve::is_approx].
pub const DEFAULT_APPROX_ORDER: usize = 5;

/// Time step used when comparing two curves by sampling them.
pub const APPROX_SAMPLE_STEP: f64 = 0.01;

/// Whether a curve validates its inputs.
///
/// A checked curve validates its construction parameters and rejects evaluation times
/// outside of its domain. An unchecked curve skips those checks, so evaluating it outside
/// of its domain simply extrapolates the polynomial.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Safety {
    #[default]
    Checked,
    Unchecked,
}

impl Safety {
    /// Returns true if inputs are validated.
    pub const fn is_checked(self) -> bool {
        matches!(self, Safety::Checked)
    }
}

impl fmt::Display for Safety {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Safety::Checked => write!(f, "checked"),
            Safety::Unchecked => write!(f, "unchecked"),
        }
    }
}

impl FromStr for Safety {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "checked" => Ok(Safety::Checked),
            "unchecked" => Ok(Safety::Unchecked),
            other => Err(CurveError::InvariantViolation(format!(
                "unknown safety mode '{}'",
                other
            ))),
        }
    }
}

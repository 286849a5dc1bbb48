//! Normalized power split point between the base and the peak unit.

use crate::error::{CoreError, CoreResult};
use crate::numeric::Real;

/// Power split threshold in `[0, 1]`.
///
/// The base unit is responsible for the share of the demand below
/// `cut * max|demand|`, the peak unit for the residual above it.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "f64", into = "f64"))]
pub struct Cut(Real);

impl Cut {
    /// Validate a raw cut value.
    pub fn new(value: Real) -> CoreResult<Self> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(CoreError::InvalidCut { value })
        }
    }

    /// Get the raw value.
    pub fn value(self) -> Real {
        self.0
    }

    /// Share left to the peak unit, `1 - cut`.
    pub fn complement(self) -> Real {
        1.0 - self.0
    }
}

impl TryFrom<Real> for Cut {
    type Error = CoreError;

    fn try_from(value: Real) -> CoreResult<Self> {
        Self::new(value)
    }
}

impl From<Cut> for Real {
    fn from(cut: Cut) -> Self {
        cut.0
    }
}

impl std::fmt::Display for Cut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bounds() {
        assert_eq!(Cut::new(0.0).unwrap().value(), 0.0);
        assert_eq!(Cut::new(1.0).unwrap().value(), 1.0);
        assert_eq!(Cut::new(0.4).unwrap().complement(), 0.6);
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(Cut::new(-0.1), Err(CoreError::InvalidCut { value: -0.1 }));
        assert_eq!(Cut::new(1.5), Err(CoreError::InvalidCut { value: 1.5 }));
        assert!(Cut::new(Real::NAN).is_err());
    }
}

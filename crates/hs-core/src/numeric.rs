use crate::CoreError;

/// Floating point type used throughout the simulator.
pub type Real = f64;

/// Absolute/relative tolerance pair.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Check that a signal period is usable as an integration horizon.
pub fn ensure_period(period: Real) -> Result<Real, CoreError> {
    if period.is_finite() && period > 0.0 {
        Ok(period)
    } else {
        Err(CoreError::InvalidPeriod { value: period })
    }
}

/// Symmetric saturation `[-limit, limit]`.
///
/// A negative or NaN limit saturates to zero.
pub fn saturate(v: Real, limit: Real) -> Real {
    let limit = if limit > 0.0 { limit } else { 0.0 };
    v.clamp(-limit, limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_period_rejects_zero_and_infinite() {
        assert!(ensure_period(1.0).is_ok());
        assert_eq!(
            ensure_period(0.0),
            Err(CoreError::InvalidPeriod { value: 0.0 })
        );
        assert!(ensure_period(-2.0).is_err());
        assert!(ensure_period(Real::INFINITY).is_err());
        assert!(ensure_period(Real::NAN).is_err());
    }

    #[test]
    fn saturate_is_symmetric() {
        assert_eq!(saturate(3.0, 2.0), 2.0);
        assert_eq!(saturate(-3.0, 2.0), -2.0);
        assert_eq!(saturate(1.5, 2.0), 1.5);
        assert_eq!(saturate(1.5, 0.0), 0.0);
        assert_eq!(saturate(1.5, -1.0), 0.0);
        assert_eq!(saturate(1.5, Real::NAN), 0.0);
    }
}

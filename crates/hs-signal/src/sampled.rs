//! Periodic piecewise-linear signal built from equally spaced samples.

use hs_core::Real;
use serde::{Deserialize, Serialize};

use crate::error::{SignalError, SignalResult};
use crate::signal::{Signal, check_period};

/// Samples `v_0 .. v_{n-1}` taken at `t_i = i * period / n`.
///
/// Between samples the value is interpolated linearly; the last sample
/// connects back to the first, so the signal is continuous across periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampledSignal {
    #[serde(default = "default_kind")]
    kind: String,
    period: Real,
    samples: Vec<Real>,
}

fn default_kind() -> String {
    "sampled".to_string()
}

impl SampledSignal {
    pub const MIN_SAMPLES: usize = 2;

    pub fn new(period: Real, samples: Vec<Real>) -> SignalResult<Self> {
        let signal = Self {
            kind: default_kind(),
            period,
            samples,
        };
        signal.validate()?;
        Ok(signal)
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn samples(&self) -> &[Real] {
        &self.samples
    }

    pub fn validate(&self) -> SignalResult<()> {
        check_period(self.period)?;
        if self.samples.len() < Self::MIN_SAMPLES {
            return Err(SignalError::TooFewSamples {
                got: self.samples.len(),
                min: Self::MIN_SAMPLES,
            });
        }
        if self.samples.iter().any(|v| !v.is_finite()) {
            return Err(SignalError::NonFinite { what: "sample" });
        }
        Ok(())
    }
}

impl Signal for SampledSignal {
    fn value(&self, t: Real) -> Real {
        let n = self.samples.len();
        // Only reachable for a deserialized signal that skipped validation
        if n == 0 {
            return 0.0;
        }
        let u = t.rem_euclid(self.period) / self.period * n as Real;
        // rem_euclid can round up to exactly `period`
        let i = (u.floor() as usize) % n;
        let frac = u - u.floor();
        let a = self.samples[i];
        let b = self.samples[(i + 1) % n];
        a + (b - a) * frac
    }

    fn period(&self) -> Real {
        self.period
    }

    fn kind(&self) -> &str {
        &self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn interpolates_between_samples() {
        let sig = SampledSignal::new(4.0, vec![0.0, 2.0, 4.0, 2.0]).unwrap();
        assert_abs_diff_eq!(sig.value(0.0), 0.0);
        assert_abs_diff_eq!(sig.value(0.5), 1.0);
        assert_abs_diff_eq!(sig.value(2.0), 4.0);
        assert_abs_diff_eq!(sig.value(3.5), 1.0);
    }

    #[test]
    fn wraps_at_period_end() {
        let sig = SampledSignal::new(4.0, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_abs_diff_eq!(sig.value(4.0), sig.value(0.0));
        assert_abs_diff_eq!(sig.value(5.0), sig.value(1.0));
    }

    #[test]
    fn rejects_short_or_non_finite_samples() {
        assert_eq!(
            SampledSignal::new(1.0, vec![1.0]).unwrap_err(),
            SignalError::TooFewSamples { got: 1, min: 2 }
        );
        assert!(SampledSignal::new(1.0, vec![1.0, Real::INFINITY]).is_err());
    }

    #[test]
    fn unvalidated_empty_signal_evaluates_to_zero() {
        let sig: SampledSignal = serde_yaml::from_str("period: 2.0\nsamples: []\n").unwrap();
        assert!(sig.validate().is_err());
        assert!(sig.samples().is_empty());
        assert_eq!(sig.value(0.7), 0.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn value_stays_within_sample_range(
            samples in prop::collection::vec(-100.0_f64..100.0_f64, 2..32),
            t in -50.0_f64..50.0_f64,
        ) {
            let sig = SampledSignal::new(3.0, samples.clone()).unwrap();
            let lo = samples.iter().cloned().fold(f64::INFINITY, f64::min);
            let hi = samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let v = sig.value(t);
            prop_assert!(v >= lo - 1e-9 && v <= hi + 1e-9);
        }
    }
}

//! Sum-of-harmonics demand signal.

use std::f64::consts::TAU;

use hs_core::Real;
use serde::{Deserialize, Serialize};

use crate::error::{SignalError, SignalResult};
use crate::signal::{Signal, check_period};

/// One sine component: `amplitude * sin(2π * order * t / period + phase)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Harmonic {
    pub amplitude: Real,
    /// Multiple of the fundamental frequency `1 / period`.
    pub order: Real,
    /// Phase shift (radians).
    #[serde(default)]
    pub phase: Real,
}

impl Harmonic {
    pub fn new(amplitude: Real, order: Real) -> Self {
        Self {
            amplitude,
            order,
            phase: 0.0,
        }
    }

    pub fn with_phase(mut self, phase: Real) -> Self {
        self.phase = phase;
        self
    }
}

/// `offset + Σ amplitude_k * sin(2π * order_k * t / period + phase_k)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarmonicSignal {
    #[serde(default = "default_kind")]
    pub kind: String,
    pub period: Real,
    #[serde(default)]
    pub offset: Real,
    pub harmonics: Vec<Harmonic>,
}

fn default_kind() -> String {
    "harmonic".to_string()
}

impl HarmonicSignal {
    /// Create a validated harmonic signal.
    pub fn new(period: Real, harmonics: Vec<Harmonic>) -> SignalResult<Self> {
        let signal = Self {
            kind: default_kind(),
            period,
            offset: 0.0,
            harmonics,
        };
        signal.validate()?;
        Ok(signal)
    }

    /// Set a constant offset.
    pub fn with_offset(mut self, offset: Real) -> Self {
        self.offset = offset;
        self
    }

    /// Set the pass-through type tag.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Check period and parameters; deserialized signals must be validated
    /// before use.
    pub fn validate(&self) -> SignalResult<()> {
        check_period(self.period)?;
        if !self.offset.is_finite() {
            return Err(SignalError::NonFinite { what: "offset" });
        }
        for h in &self.harmonics {
            if !h.amplitude.is_finite() {
                return Err(SignalError::NonFinite { what: "amplitude" });
            }
            if !h.order.is_finite() {
                return Err(SignalError::NonFinite { what: "order" });
            }
            if !h.phase.is_finite() {
                return Err(SignalError::NonFinite { what: "phase" });
            }
        }
        Ok(())
    }
}

impl Signal for HarmonicSignal {
    fn value(&self, t: Real) -> Real {
        let w = TAU * t / self.period;
        self.harmonics.iter().fold(self.offset, |acc, h| {
            acc + h.amplitude * (h.order * w + h.phase).sin()
        })
    }

    fn period(&self) -> Real {
        self.period
    }

    fn kind(&self) -> &str {
        &self.kind
    }
}

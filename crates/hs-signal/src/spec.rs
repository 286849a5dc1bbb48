//! Serializable signal descriptions for scenario files.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::SignalResult;
use crate::harmonic::HarmonicSignal;
use crate::sampled::SampledSignal;
use crate::signal::SharedSignal;

/// Signal definition as written in a scenario file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SignalSpec {
    Harmonic(HarmonicSignal),
    Sampled(SampledSignal),
}

impl SignalSpec {
    /// Validate and turn the description into a shared signal.
    pub fn build(self) -> SignalResult<SharedSignal> {
        match self {
            Self::Harmonic(sig) => {
                sig.validate()?;
                Ok(Arc::new(sig))
            }
            Self::Sampled(sig) => {
                sig.validate()?;
                Ok(Arc::new(sig))
            }
        }
    }
}

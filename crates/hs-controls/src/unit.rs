//! Storage unit capability descriptors.

use serde::{Deserialize, Serialize};

/// Which share of the demand a unit serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageRole {
    /// Low-power share, below the cut.
    Base,
    /// Residual share, above the cut.
    Peak,
}

/// Power and energy capability of one storage unit.
///
/// Power and energy are in the units of the demand signal (power) and
/// demand times seconds (energy).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StorageUnit {
    pub role: StorageRole,
    /// Symmetric power limit (charge and discharge).
    pub power: f64,
    /// Usable energy capacity.
    pub energy: f64,
}

impl StorageUnit {
    pub fn new(role: StorageRole, power: f64, energy: f64) -> Self {
        Self {
            role,
            power,
            energy,
        }
    }

    pub fn base(power: f64, energy: f64) -> Self {
        Self::new(StorageRole::Base, power, energy)
    }

    pub fn peak(power: f64, energy: f64) -> Self {
        Self::new(StorageRole::Peak, power, energy)
    }

    /// Energy-to-power ratio (seconds), `None` for a zero-power unit.
    pub fn discharge_time(&self) -> Option<f64> {
        (self.power > 0.0).then(|| self.energy / self.power)
    }
}

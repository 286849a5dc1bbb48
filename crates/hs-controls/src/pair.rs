//! Pair descriptor builders: split a demand into base and peak duties.

use std::fmt;
use std::sync::Arc;

use hs_core::{Cut, Strategy, saturate};
use hs_signal::{SharedSignal, peak_abs, sample_uniform};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ControlError, ControlResult};
use crate::reference::ReferenceSignal;
use crate::unit::{StorageRole, StorageUnit};

/// Descriptors for both units plus the base reference trajectory.
#[derive(Debug, Clone)]
pub struct StoragePair<D> {
    pub base: D,
    pub peak: D,
    pub reference: SharedSignal,
}

/// Builds the storage pair for a signal, cut and strategy.
pub trait PairBuilder: Send + Sync {
    /// Descriptor type handed to the control law factory.
    type Descriptor: Clone + fmt::Debug + Send + Sync;

    fn build(
        &self,
        signal: &SharedSignal,
        cut: Cut,
        strategy: Strategy,
        settings: &PairSettings,
    ) -> ControlResult<StoragePair<Self::Descriptor>>;
}

/// Settings for pair construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairSettings {
    /// Number of intervals used to sample one period of the demand.
    pub resolution: usize,
    /// Moving-average window of the `inter` reference, as a fraction of the
    /// period, in `[0, 1]`.
    pub smoothing: f64,
    /// Simpson panels per reference evaluation.
    pub quadrature_points: usize,
}

impl Default for PairSettings {
    fn default() -> Self {
        Self {
            resolution: 2048,
            smoothing: 0.05,
            quadrature_points: 32,
        }
    }
}

impl PairSettings {
    pub fn validate(&self) -> ControlResult<()> {
        if self.resolution < 2 {
            return Err(ControlError::InvalidArg {
                what: "resolution must be at least 2",
            });
        }
        if !(0.0..=1.0).contains(&self.smoothing) {
            return Err(ControlError::InvalidArg {
                what: "smoothing must lie in [0, 1]",
            });
        }
        if self.quadrature_points < 2 {
            return Err(ControlError::InvalidArg {
                what: "quadrature_points must be at least 2",
            });
        }
        Ok(())
    }
}

/// Splits the demand by saturating it at `cut * max|demand|`.
///
/// The base unit serves the saturated demand and the peak unit the
/// residual. Energy capacities are the peak-to-peak swing of each share's
/// cumulative energy over one period.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClippingPairBuilder;

impl PairBuilder for ClippingPairBuilder {
    type Descriptor = StorageUnit;

    fn build(
        &self,
        signal: &SharedSignal,
        cut: Cut,
        strategy: Strategy,
        settings: &PairSettings,
    ) -> ControlResult<StoragePair<StorageUnit>> {
        settings.validate()?;

        let period = signal.period();
        let dt = period / settings.resolution as f64;
        let samples = sample_uniform(signal.as_ref(), settings.resolution);
        if let Some(i) = samples.iter().position(|v| !v.is_finite()) {
            return Err(ControlError::NonFinite { t: i as f64 * dt });
        }

        let p_max = peak_abs(&samples);
        let base_power = cut.value() * p_max;
        let peak_power = cut.complement() * p_max;

        let base_share: Vec<f64> = samples.iter().map(|p| saturate(*p, base_power)).collect();
        let peak_share: Vec<f64> = samples
            .iter()
            .zip(&base_share)
            .map(|(p, b)| p - b)
            .collect();

        let base = StorageUnit::new(StorageRole::Base, base_power, energy_swing(&base_share, dt));
        let peak = StorageUnit::new(StorageRole::Peak, peak_power, energy_swing(&peak_share, dt));

        let reference = match strategy {
            Strategy::Inter => ReferenceSignal::new(
                Arc::clone(signal),
                base_power,
                settings.smoothing * period,
                settings.quadrature_points,
            ),
            Strategy::NoInter => ReferenceSignal::clipped(Arc::clone(signal), base_power),
        };

        debug!(
            cut = cut.value(),
            %strategy,
            p_max,
            base_energy = base.energy,
            peak_energy = peak.energy,
            "storage pair built"
        );

        Ok(StoragePair {
            base,
            peak,
            reference: Arc::new(reference),
        })
    }
}

/// Peak-to-peak of the trapezoidal cumulative integral of `power`.
fn energy_swing(power: &[f64], dt: f64) -> f64 {
    let mut energy = 0.0;
    let mut lo: f64 = 0.0;
    let mut hi: f64 = 0.0;
    for w in power.windows(2) {
        energy += 0.5 * (w[0] + w[1]) * dt;
        lo = lo.min(energy);
        hi = hi.max(energy);
    }
    hi - lo
}

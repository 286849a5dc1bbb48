//! Closed-loop control laws for a storage pair.
//!
//! A law maps the instantaneous demand, the base reference and the pair
//! state `[E_base, E_peak]` to unit powers. The state is the energy offset
//! of each unit since the start of the period; positive power discharges a
//! unit, so the state derivative is `-power`.
//!
//! Laws are stateless: all time dependence comes in through `demand` and
//! `reference`, so an integrator may evaluate them in any order.

use std::fmt;

use hs_core::{BASE, Cut, PAIR_DIM, PEAK, Strategy, saturate};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ControlError, ControlResult};
use crate::unit::{StorageRole, StorageUnit};

/// Instantaneous power of each unit (positive = discharge).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UnitPowers {
    pub base: f64,
    pub peak: f64,
}

impl UnitPowers {
    pub fn total(&self) -> f64 {
        self.base + self.peak
    }

    /// Power moved from one unit into the other, zero when both units push
    /// in the same direction.
    pub fn interchange(&self) -> f64 {
        if self.base * self.peak < 0.0 {
            self.base.abs().min(self.peak.abs())
        } else {
            0.0
        }
    }
}

/// Pure feedback law `(demand, reference, state) -> derivative`.
pub trait ControlLaw: Send + Sync + fmt::Debug {
    /// Strategy this law implements.
    fn strategy(&self) -> Strategy;

    /// Unit powers for the given demand, reference and state.
    fn powers(&self, demand: f64, reference: f64, state: &DVector<f64>) -> UnitPowers;

    /// State derivative `[dE_base/dt, dE_peak/dt]`.
    fn derivative(&self, demand: f64, reference: f64, state: &DVector<f64>) -> DVector<f64> {
        let p = self.powers(demand, reference, state);
        let mut dxdt = DVector::zeros(PAIR_DIM);
        dxdt[BASE] = -p.base;
        dxdt[PEAK] = -p.peak;
        dxdt
    }
}

/// Builds the control law for a pair of descriptors.
pub trait ControlLawFactory<D>: Send + Sync {
    fn build(
        &self,
        cut: Cut,
        strategy: Strategy,
        base: &D,
        peak: &D,
        settings: &LawSettings,
    ) -> ControlResult<Box<dyn ControlLaw>>;
}

/// Settings for the bundled laws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LawSettings {
    /// Gain (1/s) pulling the peak unit's energy offset back to zero through
    /// the base unit; `inter` only.
    pub recharge_gain: f64,
}

impl Default for LawSettings {
    fn default() -> Self {
        Self { recharge_gain: 1.0 }
    }
}

impl LawSettings {
    pub fn validate(&self) -> ControlResult<()> {
        if !(self.recharge_gain.is_finite() && self.recharge_gain >= 0.0) {
            return Err(ControlError::InvalidArg {
                what: "recharge_gain must be finite and non-negative",
            });
        }
        Ok(())
    }
}

/// `inter`: the base unit follows the reference plus a recharge term for the
/// peak unit; the peak unit covers whatever the base does not. When the peak
/// saturates, the base picks up the remainder within its own limit.
///
/// - `p_cmd = sat(reference - k * E_peak, P_base)`
/// - `p_peak = sat(demand - p_cmd, P_peak)`
/// - `p_base = p_cmd`, or `sat(demand - p_peak, P_base)` if the peak saturated
///
/// Demand is missed only by `max(0, |demand| - P_base - P_peak)`.
#[derive(Debug, Clone, PartialEq)]
pub struct InterchangeLaw {
    pub base_power: f64,
    pub peak_power: f64,
    pub recharge_gain: f64,
}

impl ControlLaw for InterchangeLaw {
    fn strategy(&self) -> Strategy {
        Strategy::Inter
    }

    fn powers(&self, demand: f64, reference: f64, state: &DVector<f64>) -> UnitPowers {
        let peak_energy = state.get(PEAK).copied().unwrap_or(0.0);
        let command = saturate(reference - self.recharge_gain * peak_energy, self.base_power);
        let peak = saturate(demand - command, self.peak_power);
        let base = if (demand - command).abs() > self.peak_power {
            saturate(demand - peak, self.base_power)
        } else {
            command
        };
        UnitPowers { base, peak }
    }
}

/// `nointer`: each unit serves only its own share of the demand.
///
/// - `p_base = sat(reference, P_base)`
/// - `p_peak = sat(demand - sat(demand, P_base), P_peak)`
///
/// A unit's shortfall is never picked up by the other unit.
#[derive(Debug, Clone, PartialEq)]
pub struct IsolatedLaw {
    pub base_power: f64,
    pub peak_power: f64,
}

impl ControlLaw for IsolatedLaw {
    fn strategy(&self) -> Strategy {
        Strategy::NoInter
    }

    fn powers(&self, demand: f64, reference: f64, _state: &DVector<f64>) -> UnitPowers {
        let base = saturate(reference, self.base_power);
        let peak = saturate(demand - saturate(demand, self.base_power), self.peak_power);
        UnitPowers { base, peak }
    }
}

/// Factory for [`InterchangeLaw`] and [`IsolatedLaw`] over [`StorageUnit`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct SaturatingLawFactory;

fn check_unit(unit: &StorageUnit, role: StorageRole) -> ControlResult<()> {
    if unit.role != role {
        return Err(ControlError::Incompatible {
            what: format!("expected a {role:?} unit, got {:?}", unit.role),
        });
    }
    if !(unit.power.is_finite() && unit.power >= 0.0) {
        return Err(ControlError::InvalidArg {
            what: "unit power must be finite and non-negative",
        });
    }
    Ok(())
}

impl ControlLawFactory<StorageUnit> for SaturatingLawFactory {
    fn build(
        &self,
        cut: Cut,
        strategy: Strategy,
        base: &StorageUnit,
        peak: &StorageUnit,
        settings: &LawSettings,
    ) -> ControlResult<Box<dyn ControlLaw>> {
        check_unit(base, StorageRole::Base)?;
        check_unit(peak, StorageRole::Peak)?;
        settings.validate()?;

        debug!(cut = cut.value(), %strategy, "building control law");

        let law: Box<dyn ControlLaw> = match strategy {
            Strategy::Inter => Box::new(InterchangeLaw {
                base_power: base.power,
                peak_power: peak.power,
                recharge_gain: settings.recharge_gain,
            }),
            Strategy::NoInter => Box::new(IsolatedLaw {
                base_power: base.power,
                peak_power: peak.power,
            }),
        };
        Ok(law)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn state(base: f64, peak: f64) -> DVector<f64> {
        DVector::from_vec(vec![base, peak])
    }

    fn build(strategy: Strategy) -> Box<dyn ControlLaw> {
        SaturatingLawFactory
            .build(
                Cut::new(0.5).unwrap(),
                strategy,
                &StorageUnit::base(1.0, 1.0),
                &StorageUnit::peak(1.0, 1.0),
                &LawSettings::default(),
            )
            .unwrap()
    }

    #[test]
    fn idle_demand_gives_zero_derivative() {
        for strategy in [Strategy::Inter, Strategy::NoInter] {
            let law = build(strategy);
            assert_eq!(law.strategy(), strategy);
            assert_eq!(law.derivative(0.0, 0.0, &state(0.0, 0.0)), state(0.0, 0.0));
        }
    }

    #[test]
    fn derivative_is_negative_power() {
        let law = build(Strategy::NoInter);
        let p = law.powers(1.5, 0.8, &state(0.0, 0.0));
        assert_eq!(p, UnitPowers { base: 0.8, peak: 0.5 });
        assert_eq!(law.derivative(1.5, 0.8, &state(0.0, 0.0)), state(-0.8, -0.5));
    }

    #[test]
    fn inter_tracks_demand_when_unsaturated() {
        let law = build(Strategy::Inter);
        let p = law.powers(1.2, 0.7, &state(0.3, -0.1));
        assert_abs_diff_eq!(p.total(), 1.2, epsilon = 1e-12);
        assert_abs_diff_eq!(p.base, 0.8, epsilon = 1e-12);
    }

    #[test]
    fn inter_base_covers_saturated_peak() {
        let law = InterchangeLaw {
            base_power: 0.4,
            peak_power: 0.6,
            recharge_gain: 1.0,
        };
        let p = law.powers(1.0, 0.1, &state(0.0, 0.0));
        assert_abs_diff_eq!(p.peak, 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(p.base, 0.4, epsilon = 1e-12);
        assert_abs_diff_eq!(p.total(), 1.0, epsilon = 1e-12);

        // Beyond the joint limit only the excess is missed
        let p = law.powers(-1.5, 0.3, &state(0.0, 0.0));
        assert_abs_diff_eq!(p.total(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn inter_base_recharges_drained_peak() {
        let law = build(Strategy::Inter);
        // Peak drained, no demand: base discharges into the peak
        let p = law.powers(0.0, 0.0, &state(0.0, -0.4));
        assert_abs_diff_eq!(p.base, 0.4, epsilon = 1e-12);
        assert_abs_diff_eq!(p.peak, -0.4, epsilon = 1e-12);
        assert_abs_diff_eq!(p.interchange(), 0.4, epsilon = 1e-12);
    }

    #[test]
    fn nointer_never_interchanges() {
        let law = build(Strategy::NoInter);
        for demand in [-3.0, -1.0, -0.2, 0.0, 0.4, 1.1, 2.5] {
            let p = law.powers(demand, saturate(demand, 1.0), &state(5.0, -5.0));
            assert_eq!(p.interchange(), 0.0, "demand {demand}");
        }
    }

    #[test]
    fn nointer_shortfall_not_compensated() {
        let law = build(Strategy::NoInter);
        // Demand beyond both limits: each unit saturates on its own share
        let p = law.powers(3.0, 1.0, &state(0.0, 0.0));
        assert_eq!(p, UnitPowers { base: 1.0, peak: 1.0 });
        // Reference below the base share: peak does not fill the gap
        let p = law.powers(0.8, 0.2, &state(0.0, 0.0));
        assert_eq!(p, UnitPowers { base: 0.2, peak: 0.0 });
    }

    #[test]
    fn factory_rejects_swapped_descriptors() {
        let err = SaturatingLawFactory
            .build(
                Cut::new(0.5).unwrap(),
                Strategy::Inter,
                &StorageUnit::peak(1.0, 1.0),
                &StorageUnit::base(1.0, 1.0),
                &LawSettings::default(),
            )
            .unwrap_err();
        assert!(matches!(err, ControlError::Incompatible { .. }));
    }

    #[test]
    fn factory_rejects_negative_gain() {
        let err = SaturatingLawFactory
            .build(
                Cut::new(0.5).unwrap(),
                Strategy::Inter,
                &StorageUnit::base(1.0, 1.0),
                &StorageUnit::peak(1.0, 1.0),
                &LawSettings { recharge_gain: -1.0 },
            )
            .unwrap_err();
        assert!(matches!(err, ControlError::InvalidArg { .. }));
    }
}

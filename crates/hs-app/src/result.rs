//! The simulation result record and its JSON export.

use hs_core::{BASE, Cut, PEAK, Strategy};
use hs_signal::SharedSignal;
use hs_sim::{State, Trajectory};
use serde::Serialize;

/// Outcome of one operation simulation.
///
/// Built once by the simulator and read-only afterwards. States hold the
/// energy offset of each unit (`[E_base, E_peak]`) since `t = 0`.
#[derive(Debug, Clone)]
pub struct SimulationResult<D> {
    base: D,
    peak: D,
    kind: String,
    cut: Cut,
    strategy: Strategy,
    reference: SharedSignal,
    time: Vec<f64>,
    states: Vec<State>,
}

impl<D> SimulationResult<D> {
    pub(crate) fn new(
        base: D,
        peak: D,
        kind: String,
        cut: Cut,
        strategy: Strategy,
        reference: SharedSignal,
        trajectory: Trajectory,
    ) -> Self {
        Self {
            base,
            peak,
            kind,
            cut,
            strategy,
            reference,
            time: trajectory.t,
            states: trajectory.x,
        }
    }

    /// Base unit descriptor, as produced by the pair builder.
    pub fn base(&self) -> &D {
        &self.base
    }

    /// Peak unit descriptor, as produced by the pair builder.
    pub fn peak(&self) -> &D {
        &self.peak
    }

    /// Kind tag of the demand signal.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn cut(&self) -> Cut {
        self.cut
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Reference trajectory followed by the base unit.
    pub fn reference(&self) -> &SharedSignal {
        &self.reference
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Alias of [`states`](Self::states) named after what the state holds.
    pub fn energy_offsets(&self) -> &[State] {
        &self.states
    }

    pub fn base_energy(&self) -> Vec<f64> {
        self.states.iter().map(|x| x[BASE]).collect()
    }

    pub fn peak_energy(&self) -> Vec<f64> {
        self.states.iter().map(|x| x[PEAK]).collect()
    }

    pub fn final_state(&self) -> Option<&State> {
        self.states.last()
    }

    /// Reference sampled on the result's time grid.
    pub fn reference_on_grid(&self) -> Vec<f64> {
        self.time.iter().map(|t| self.reference.value(*t)).collect()
    }

    /// Flatten into a serializable record.
    pub fn export(&self) -> ResultExport<'_, D> {
        ResultExport {
            kind: &self.kind,
            cut: self.cut.value(),
            strategy: self.strategy,
            base: &self.base,
            peak: &self.peak,
            time: &self.time,
            base_energy: self.base_energy(),
            peak_energy: self.peak_energy(),
            reference: self.reference_on_grid(),
        }
    }
}

/// JSON-friendly view of a [`SimulationResult`].
#[derive(Debug, Serialize)]
pub struct ResultExport<'a, D> {
    pub kind: &'a str,
    pub cut: f64,
    pub strategy: Strategy,
    pub base: &'a D,
    pub peak: &'a D,
    pub time: &'a [f64],
    pub base_energy: Vec<f64>,
    pub peak_energy: Vec<f64>,
    pub reference: Vec<f64>,
}

impl<D: Serialize> ResultExport<'_, D> {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hs_signal::FnSignal;
    use std::sync::Arc;

    fn record() -> SimulationResult<&'static str> {
        let mut traj = Trajectory::new();
        traj.push(0.0, State::from_vec(vec![0.0, 0.0]));
        traj.push(0.5, State::from_vec(vec![-1.0, 0.25]));
        traj.push(1.0, State::from_vec(vec![-2.0, 0.0]));
        let reference = Arc::new(FnSignal::new("ramp", 1.0, |t| 2.0 * t).unwrap());
        SimulationResult::new(
            "b",
            "p",
            "demo".into(),
            Cut::new(0.3).unwrap(),
            Strategy::NoInter,
            reference,
            traj,
        )
    }

    #[test]
    fn accessors() {
        let r = record();
        assert_eq!(r.len(), 3);
        assert_eq!(*r.base(), "b");
        assert_eq!(r.kind(), "demo");
        assert_eq!(r.base_energy(), vec![0.0, -1.0, -2.0]);
        assert_eq!(r.peak_energy(), vec![0.0, 0.25, 0.0]);
        assert_eq!(r.reference_on_grid(), vec![0.0, 1.0, 2.0]);
        assert_eq!(r.final_state().unwrap()[BASE], -2.0);
    }

    #[test]
    fn export_to_json() {
        let r = record();
        let json = r.export().to_json_pretty().unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["strategy"], "nointer");
        assert_eq!(v["cut"], 0.3);
        assert_eq!(v["base"], "b");
        assert_eq!(v["time"].as_array().unwrap().len(), 3);
        assert_eq!(v["reference"][2], 2.0);
    }
}

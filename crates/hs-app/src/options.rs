//! Options controlling one operation simulation.

use hs_controls::{LawSettings, PairSettings};
use hs_sim::{IntegratorSettings, SolverKind};
use serde::{Deserialize, Serialize};

use crate::error::OperationError;

/// Solver, collaborator and plotting options for the operation simulator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationOptions {
    /// Integrator used over one period.
    pub continuous_solver: SolverKind,
    pub integrator: IntegratorSettings,
    /// Invoke the visualizer after a successful run.
    pub plot_sim: bool,
    pub pair: PairSettings,
    pub law: LawSettings,
}

impl OperationOptions {
    /// Check every nested settings block.
    ///
    /// The simulator does not call this itself: collaborator settings are
    /// checked by the collaborators and surface as their own errors.
    pub fn validate(&self) -> Result<(), OperationError> {
        self.integrator.validate()?;
        self.pair.validate()?;
        self.law.validate()?;
        Ok(())
    }

    pub fn with_solver(mut self, solver: SolverKind) -> Self {
        self.continuous_solver = solver;
        self
    }

    pub fn with_plot(mut self, plot_sim: bool) -> Self {
        self.plot_sim = plot_sim;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let o = OperationOptions::default();
        assert_eq!(o.continuous_solver, SolverKind::DormandPrince);
        assert!(!o.plot_sim);
        assert!(o.validate().is_ok());
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let o: OperationOptions = serde_yaml::from_str(
            "continuous_solver: rk4\nplot_sim: true\nintegrator:\n  dt: 0.001\n",
        )
        .unwrap();
        assert_eq!(o.continuous_solver, SolverKind::Rk4);
        assert!(o.plot_sim);
        assert_eq!(o.integrator.dt, 0.001);
        assert_eq!(o.integrator.max_steps, IntegratorSettings::default().max_steps);
        assert_eq!(o.pair, PairSettings::default());
    }

    #[test]
    fn nested_errors_are_classified() {
        let mut o = OperationOptions::default();
        o.integrator.dt = -1.0;
        assert!(o.validate().unwrap_err().is_integration());

        let mut o = OperationOptions::default();
        o.pair.smoothing = 2.0;
        assert!(o.validate().unwrap_err().is_collaborator());
    }
}

//! Solver selection and settings.

use serde::{Deserialize, Serialize};

use crate::adaptive::DormandPrince45;
use crate::error::{SimError, SimResult};
use crate::integrator::{FixedStep, ForwardEuler, Rk4};
use crate::model::{Rhs, State, TimeSpan};
use crate::trajectory::Trajectory;

/// A numerical ODE integrator.
///
/// Integrates `rhs` over `span` starting from `y0` and returns the recorded
/// trajectory. Implementations must either cover the whole span (first time
/// `span.start`, last time `span.end`) or fail; partial trajectories are
/// never returned.
pub trait OdeSolver: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    fn solve(
        &self,
        rhs: &mut Rhs<'_>,
        span: TimeSpan,
        y0: &State,
        settings: &IntegratorSettings,
    ) -> SimResult<Trajectory>;
}

/// Settings forwarded verbatim to the selected solver.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegratorSettings {
    /// Fixed time step (seconds), fixed-step solvers only
    pub dt: f64,
    /// Relative error tolerance, adaptive solvers only
    pub rtol: f64,
    /// Absolute error tolerance, adaptive solvers only
    pub atol: f64,
    /// First trial step; defaults to 1% of the span
    pub initial_step: Option<f64>,
    /// Smallest step an adaptive solver may take before giving up
    pub min_step: f64,
    /// Largest adaptive step; defaults to the whole span
    pub max_step: Option<f64>,
    /// Maximum number of steps (safety limit)
    pub max_steps: usize,
    /// Record every N-th accepted step (decimation); the final point is
    /// always recorded
    pub record_every: usize,
}

impl Default for IntegratorSettings {
    fn default() -> Self {
        Self {
            dt: 1e-2,
            rtol: 1e-6,
            atol: 1e-9,
            initial_step: None,
            min_step: 1e-12,
            max_step: None,
            max_steps: 1_000_000,
            record_every: 1,
        }
    }
}

impl IntegratorSettings {
    pub fn validate(&self) -> SimResult<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(SimError::InvalidArg {
                what: "dt must be positive",
            });
        }
        if !(self.rtol.is_finite() && self.rtol > 0.0) {
            return Err(SimError::InvalidArg {
                what: "rtol must be positive",
            });
        }
        if !(self.atol.is_finite() && self.atol >= 0.0) {
            return Err(SimError::InvalidArg {
                what: "atol must be non-negative",
            });
        }
        if !(self.min_step.is_finite() && self.min_step > 0.0) {
            return Err(SimError::InvalidArg {
                what: "min_step must be positive",
            });
        }
        if let Some(h) = self.initial_step
            && !(h.is_finite() && h > 0.0)
        {
            return Err(SimError::InvalidArg {
                what: "initial_step must be positive",
            });
        }
        if let Some(h) = self.max_step
            && !(h.is_finite() && h >= self.min_step)
        {
            return Err(SimError::InvalidArg {
                what: "max_step must be at least min_step",
            });
        }
        if self.max_steps == 0 {
            return Err(SimError::InvalidArg {
                what: "max_steps must be positive",
            });
        }
        if self.record_every == 0 {
            return Err(SimError::InvalidArg {
                what: "record_every must be positive",
            });
        }
        Ok(())
    }
}

/// Built-in solver selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverKind {
    /// Forward Euler (1st-order, 1 rhs call per step).
    ForwardEuler,
    /// Classical 4th-order Runge-Kutta, fixed step.
    Rk4,
    /// Dormand-Prince 5(4) with adaptive step size (default).
    #[default]
    DormandPrince,
}

impl std::str::FromStr for SolverKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "forward_euler" | "euler" => Ok(Self::ForwardEuler),
            "rk4" => Ok(Self::Rk4),
            "dormand_prince" | "dopri5" | "rk45" => Ok(Self::DormandPrince),
            _ => Err(SimError::InvalidArg {
                what: "unknown solver (expected forward_euler, rk4 or dormand_prince)",
            }),
        }
    }
}

impl OdeSolver for SolverKind {
    fn name(&self) -> &'static str {
        match self {
            Self::ForwardEuler => FixedStep(ForwardEuler).name(),
            Self::Rk4 => FixedStep(Rk4).name(),
            Self::DormandPrince => DormandPrince45.name(),
        }
    }

    fn solve(
        &self,
        rhs: &mut Rhs<'_>,
        span: TimeSpan,
        y0: &State,
        settings: &IntegratorSettings,
    ) -> SimResult<Trajectory> {
        match self {
            Self::ForwardEuler => FixedStep(ForwardEuler).solve(rhs, span, y0, settings),
            Self::Rk4 => FixedStep(Rk4).solve(rhs, span, y0, settings),
            Self::DormandPrince => DormandPrince45.solve(rhs, span, y0, settings),
        }
    }
}

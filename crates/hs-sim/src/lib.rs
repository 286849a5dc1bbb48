//! Solver-agnostic ODE integration for storage simulations.
//!
//! Provides:
//! - [`OdeSolver`]: the pluggable `(rhs, span, y0, settings) -> trajectory` contract
//! - Fixed-step Forward Euler and RK4 ([`FixedStep`])
//! - Adaptive Dormand-Prince 5(4) ([`DormandPrince45`])
//! - [`SolverKind`] for configuration-driven solver selection
//! - [`Trajectory`] with invariant checks

pub mod adaptive;
pub mod error;
pub mod integrator;
pub mod model;
pub mod sim;
pub mod trajectory;

// Re-exports for public API
pub use adaptive::DormandPrince45;
pub use error::{SimError, SimResult};
pub use integrator::{FixedStep, ForwardEuler, Rk4, Stepper};
pub use model::{Rhs, State, TimeSpan};
pub use sim::{IntegratorSettings, OdeSolver, SolverKind};
pub use trajectory::Trajectory;

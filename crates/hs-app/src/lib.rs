//! Application layer for hybrid storage operation studies.
//!
//! Hosts the operation simulator, which composes a pair builder, a control
//! law factory and an ODE solver into one run over a demand period, plus
//! the pieces front-ends need around it: options, result export,
//! visualizers, cut sweeps and scenario files.

pub mod error;
pub mod operation;
pub mod options;
pub mod resolve;
pub mod result;
pub mod scenario;
pub mod sweep;
pub mod visualize;

// Re-export key types for convenience
pub use error::{AppError, AppResult, OperationError, VisualizeError};
pub use operation::OperationSimulator;
pub use options::OperationOptions;
pub use resolve::{Resolved, resolve, resolve_token};
pub use result::{ResultExport, SimulationResult};
pub use scenario::{Scenario, load_scenario, save_scenario};
pub use sweep::{SweepPoint, SweepSummary, sweep_cuts, uniform_cuts};
pub use visualize::{AsciiPlot, LogVisualizer, Visualizer};

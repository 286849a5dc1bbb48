//! Error types for the hs-app service layer.

use std::path::PathBuf;

use hs_controls::ControlError;
use hs_core::CoreError;
use hs_signal::SignalError;
use hs_sim::SimError;

/// Failure of a single operation simulation.
///
/// No partial trajectory is ever returned alongside an error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OperationError {
    /// Cut, period or strategy token rejected before any collaborator ran.
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] CoreError),

    /// The pair builder or the control law factory failed.
    #[error("Collaborator failed: {0}")]
    Collaborator(#[from] ControlError),

    /// The solver failed or produced a trajectory violating its invariants.
    #[error("Integration failed: {0}")]
    Integration(#[from] SimError),
}

impl OperationError {
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    pub fn is_collaborator(&self) -> bool {
        matches!(self, Self::Collaborator(_))
    }

    pub fn is_integration(&self) -> bool {
        matches!(self, Self::Integration(_))
    }
}

/// Failure of a visualizer. Logged by the simulator, never propagated.
#[derive(Debug, thiserror::Error)]
pub enum VisualizeError {
    #[error("Nothing to plot: {0}")]
    Empty(&'static str),

    #[error("Plot output unavailable: {0}")]
    Output(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application error type for scenario files and front-ends.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to read scenario file: {path}")]
    ScenarioRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse scenario: {0}")]
    ScenarioParse(String),

    #[error("Scenario validation failed: {0}")]
    Validation(String),

    #[error("Signal error: {0}")]
    Signal(#[from] SignalError),

    #[error("Operation error: {0}")]
    Operation(#[from] OperationError),

    #[error("Export error: {0}")]
    Export(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for hs-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::ScenarioParse(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Export(err.to_string())
    }
}

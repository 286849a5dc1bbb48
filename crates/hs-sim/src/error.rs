//! Error types for ODE integration.

use thiserror::Error;

/// Errors encountered while integrating an ODE.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-finite {what} at t = {t}")]
    NonFinite { what: &'static str, t: f64 },

    #[error("State dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Step size underflow at t = {t}: dt = {dt} below minimum {min_dt}")]
    StepUnderflow { t: f64, dt: f64, min_dt: f64 },

    #[error("Maximum number of steps ({max_steps}) reached at t = {t}")]
    MaxSteps { max_steps: usize, t: f64 },

    #[error("Trajectory invariant violated: {what}")]
    Trajectory { what: String },

    #[error("Right-hand side failed: {message}")]
    Rhs { message: String },
}

pub type SimResult<T> = Result<T, SimError>;

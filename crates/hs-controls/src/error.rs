//! Error types for storage pair construction and control laws.

use thiserror::Error;

/// Result type for control operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors raised while building descriptors or control laws.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Invalid argument provided to a builder or factory.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// The demand signal produced NaN or infinity.
    #[error("Non-finite demand at t = {t}")]
    NonFinite { t: f64 },

    /// Descriptors do not fit the requested law.
    #[error("Incompatible storage descriptors: {what}")]
    Incompatible { what: String },
}

//! Error types for signal construction.

use thiserror::Error;

/// Result type for signal operations.
pub type SignalResult<T> = Result<T, SignalError>;

/// Errors that can occur while building a signal.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SignalError {
    /// Period is zero, negative or not finite.
    #[error("Invalid period: {value}")]
    InvalidPeriod { value: f64 },

    /// A parameter or sample is NaN or infinite.
    #[error("Non-finite value for {what}")]
    NonFinite { what: &'static str },

    /// Not enough samples to interpolate.
    #[error("Too few samples: got {got}, need at least {min}")]
    TooFewSamples { got: usize, min: usize },
}

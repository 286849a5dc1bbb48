use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid cut: {value} (must lie in [0, 1])")]
    InvalidCut { value: f64 },

    #[error("Unknown strategy: '{token}' (expected 'inter' or 'nointer')")]
    UnknownStrategy { token: String },

    #[error("Invalid period: {value} (must be finite and positive)")]
    InvalidPeriod { value: f64 },

    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

//! Input resolution ahead of any collaborator call.

use hs_core::{Cut, Strategy, ensure_period};
use hs_signal::Signal;
use hs_sim::TimeSpan;

use crate::error::OperationError;

/// Validated inputs of one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved {
    pub cut: Cut,
    pub strategy: Strategy,
    /// `[0, period]` of the demand signal.
    pub span: TimeSpan,
}

/// Validate cut and period; a missing strategy means [`Strategy::Inter`].
pub fn resolve(
    signal: &dyn Signal,
    cut: f64,
    strategy: Option<Strategy>,
) -> Result<Resolved, OperationError> {
    let cut = Cut::new(cut)?;
    let period = ensure_period(signal.period())?;
    let span = TimeSpan::period(period)?;
    Ok(Resolved {
        cut,
        strategy: strategy.unwrap_or_default(),
        span,
    })
}

/// Like [`resolve`], with the strategy given as a token (`inter`/`nointer`).
pub fn resolve_token(
    signal: &dyn Signal,
    cut: f64,
    token: Option<&str>,
) -> Result<Resolved, OperationError> {
    let strategy = token
        .map(str::parse::<Strategy>)
        .transpose()
        .map_err(OperationError::InvalidInput)?;
    resolve(signal, cut, strategy)
}

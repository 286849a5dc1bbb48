//! State vectors, integration spans and right-hand sides.

use nalgebra::DVector;

use crate::error::{SimError, SimResult};

/// State vector of an integrated system.
pub type State = DVector<f64>;

/// Right-hand side `dx/dt = f(t, x)`.
///
/// Solvers may call it any number of times, at non-monotonic times, and
/// discard results of rejected steps.
pub type Rhs<'a> = dyn FnMut(f64, &State) -> SimResult<State> + 'a;

/// Closed integration interval `[start, end]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeSpan {
    pub start: f64,
    pub end: f64,
}

impl TimeSpan {
    pub fn new(start: f64, end: f64) -> SimResult<Self> {
        let span = Self { start, end };
        span.validate()?;
        Ok(span)
    }

    /// Span `[0, period]`.
    pub fn period(period: f64) -> SimResult<Self> {
        Self::new(0.0, period)
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn validate(&self) -> SimResult<()> {
        if !self.start.is_finite() || !self.end.is_finite() {
            return Err(SimError::InvalidArg {
                what: "time span bounds must be finite",
            });
        }
        if self.end <= self.start {
            return Err(SimError::InvalidArg {
                what: "time span end must be after start",
            });
        }
        Ok(())
    }
}

/// Evaluate the right-hand side and check its output.
pub(crate) fn eval_rhs(rhs: &mut Rhs<'_>, t: f64, x: &State) -> SimResult<State> {
    let dxdt = rhs(t, x)?;
    if dxdt.len() != x.len() {
        return Err(SimError::DimensionMismatch {
            expected: x.len(),
            got: dxdt.len(),
        });
    }
    if dxdt.iter().any(|v| !v.is_finite()) {
        return Err(SimError::NonFinite {
            what: "derivative",
            t,
        });
    }
    Ok(dxdt)
}

pub(crate) fn ensure_finite_state(x: &State, t: f64) -> SimResult<()> {
    if x.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(SimError::NonFinite { what: "state", t })
    }
}

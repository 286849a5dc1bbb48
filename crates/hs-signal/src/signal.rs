//! The signal trait and closure-backed signals.

use std::fmt;
use std::sync::Arc;

use hs_core::Real;

use crate::error::{SignalError, SignalResult};

/// A periodic, continuous-time scalar signal.
///
/// Implementations must be pure: `value(t)` depends on `t` only and may be
/// called any number of times, in any order, from any thread.
pub trait Signal: Send + Sync + fmt::Debug {
    /// Signal value at time `t`, for `t` in `[0, period]`.
    fn value(&self, t: Real) -> Real;

    /// Length of one period (seconds). Always finite and positive.
    fn period(&self) -> Real;

    /// Free-form tag describing the signal family; pass-through metadata.
    fn kind(&self) -> &str;
}

/// Shared, thread-safe handle to a signal.
pub type SharedSignal = Arc<dyn Signal>;

type TimeFn = dyn Fn(Real) -> Real + Send + Sync;

/// Signal backed by an arbitrary closure.
#[derive(Clone)]
pub struct FnSignal {
    kind: String,
    period: Real,
    f: Arc<TimeFn>,
}

impl FnSignal {
    /// Wrap a closure as a signal with the given period.
    pub fn new<F>(kind: impl Into<String>, period: Real, f: F) -> SignalResult<Self>
    where
        F: Fn(Real) -> Real + Send + Sync + 'static,
    {
        check_period(period)?;
        Ok(Self {
            kind: kind.into(),
            period,
            f: Arc::new(f),
        })
    }

    /// The all-zero signal.
    pub fn zero(period: Real) -> SignalResult<Self> {
        Self::new("zero", period, |_| 0.0)
    }
}

impl Signal for FnSignal {
    fn value(&self, t: Real) -> Real {
        (self.f)(t)
    }

    fn period(&self) -> Real {
        self.period
    }

    fn kind(&self) -> &str {
        &self.kind
    }
}

impl fmt::Debug for FnSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSignal")
            .field("kind", &self.kind)
            .field("period", &self.period)
            .finish_non_exhaustive()
    }
}

pub(crate) fn check_period(period: Real) -> SignalResult<Real> {
    hs_core::ensure_period(period).map_err(|_| SignalError::InvalidPeriod { value: period })
}

/// Sample a signal on `n` equal intervals of one period.
///
/// Returns `n + 1` values at `t_i = i * period / n`, both ends included.
/// `n = 0` is treated as `n = 1`.
pub fn sample_uniform(signal: &dyn Signal, n: usize) -> Vec<Real> {
    let n = n.max(1);
    let dt = signal.period() / n as Real;
    (0..=n).map(|i| signal.value(i as Real * dt)).collect()
}

/// Largest absolute value in `samples`, `0.0` when empty.
pub fn peak_abs(samples: &[Real]) -> Real {
    samples.iter().fold(0.0, |acc: Real, v| acc.max(v.abs()))
}

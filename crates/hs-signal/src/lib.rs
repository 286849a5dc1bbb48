//! Continuous-time demand signals.
//!
//! A signal is a pure function of time over one period, evaluable at any
//! real time in `[0, period]`. Adaptive integrators evaluate signals at
//! arbitrary, non-monotonic times and may repeat evaluations, so every
//! implementation here is a read-only value with no interior state.
//!
//! # Provided signals
//!
//! - [`HarmonicSignal`]: offset plus a sum of sine harmonics of the period
//! - [`SampledSignal`]: periodic piecewise-linear interpolation of samples
//! - [`FnSignal`]: any `Fn(f64) -> f64` closure
//!
//! [`SignalSpec`] is the serde form used by scenario files.

pub mod error;
pub mod harmonic;
pub mod sampled;
pub mod signal;
pub mod spec;

pub use error::{SignalError, SignalResult};
pub use harmonic::{Harmonic, HarmonicSignal};
pub use sampled::SampledSignal;
pub use signal::{FnSignal, SharedSignal, Signal, peak_abs, sample_uniform};
pub use spec::SignalSpec;

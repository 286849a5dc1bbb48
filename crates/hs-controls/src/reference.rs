//! Bandwidth-limited feed-forward reference for the base unit.

use hs_core::saturate;
use hs_signal::{SharedSignal, Signal};

/// Reference power trajectory for the base unit.
///
/// `value(t)` is the periodic moving average of the demand over `window`
/// seconds centred on `t`, saturated at the base power limit. A zero window
/// gives the saturated demand itself.
///
/// The average is computed on demand with composite Simpson quadrature, so
/// the reference is a pure function of `t` like the demand it wraps.
#[derive(Debug, Clone)]
pub struct ReferenceSignal {
    demand: SharedSignal,
    limit: f64,
    window: f64,
    panels: usize,
}

impl ReferenceSignal {
    /// `window` is clamped to `[0, period]`; `panels` is rounded up to an even
    /// number of at least 2.
    pub fn new(demand: SharedSignal, limit: f64, window: f64, panels: usize) -> Self {
        let window = window.clamp(0.0, demand.period());
        let panels = panels.max(2).next_multiple_of(2);
        Self {
            demand,
            limit,
            window,
            panels,
        }
    }

    /// The saturated demand, without averaging.
    pub fn clipped(demand: SharedSignal, limit: f64) -> Self {
        Self::new(demand, limit, 0.0, 2)
    }

    pub fn limit(&self) -> f64 {
        self.limit
    }

    pub fn window(&self) -> f64 {
        self.window
    }

    fn wrapped(&self, t: f64) -> f64 {
        self.demand.value(t.rem_euclid(self.demand.period()))
    }

    fn moving_average(&self, t: f64) -> f64 {
        let a = t - 0.5 * self.window;
        let h = self.window / self.panels as f64;
        let mut sum = self.wrapped(a) + self.wrapped(a + self.window);
        for i in 1..self.panels {
            let w = if i % 2 == 1 { 4.0 } else { 2.0 };
            sum += w * self.wrapped(a + i as f64 * h);
        }
        sum * h / 3.0 / self.window
    }
}

impl Signal for ReferenceSignal {
    fn value(&self, t: f64) -> f64 {
        let raw = if self.window > 0.0 {
            self.moving_average(t)
        } else {
            self.demand.value(t)
        };
        saturate(raw, self.limit)
    }

    fn period(&self) -> f64 {
        self.demand.period()
    }

    fn kind(&self) -> &str {
        "reference"
    }
}

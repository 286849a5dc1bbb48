//! Optional visualization of a finished run.
//!
//! Visualizers only observe a [`SimulationResult`]; the simulator logs their
//! failures and returns the result regardless.

use std::fmt;
use std::io::{self, Write};
use std::sync::Mutex;

use hs_signal::Signal;
use tracing::info;

use crate::error::VisualizeError;
use crate::options::OperationOptions;
use crate::result::SimulationResult;

/// Side-effecting view of a simulation result.
pub trait Visualizer<D>: Send + Sync {
    fn render(
        &self,
        result: &SimulationResult<D>,
        signal: &dyn Signal,
        options: &OperationOptions,
    ) -> Result<(), VisualizeError>;
}

/// Emits a one-line summary through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogVisualizer;

impl<D: fmt::Debug> Visualizer<D> for LogVisualizer {
    fn render(
        &self,
        result: &SimulationResult<D>,
        signal: &dyn Signal,
        options: &OperationOptions,
    ) -> Result<(), VisualizeError> {
        let last = result
            .final_state()
            .ok_or(VisualizeError::Empty("result has no samples"))?;
        let (base_lo, base_hi) = bounds(&result.base_energy());
        let (peak_lo, peak_hi) = bounds(&result.peak_energy());
        info!(
            kind = result.kind(),
            period = signal.period(),
            cut = result.cut().value(),
            strategy = %result.strategy(),
            solver = ?options.continuous_solver,
            samples = result.len(),
            base = ?result.base(),
            peak = ?result.peak(),
            base_swing = base_hi - base_lo,
            peak_swing = peak_hi - peak_lo,
            final_state = ?last.as_slice(),
            "operation summary"
        );
        Ok(())
    }
}

/// Text chart of demand and both energy offsets over one period.
///
/// Rows are value bins, columns are time bins. `d` marks the demand, `b`
/// the base offset and `p` the peak offset; later marks overwrite earlier
/// ones in the same cell.
#[derive(Debug)]
pub struct AsciiPlot<W> {
    out: Mutex<W>,
    width: usize,
    height: usize,
}

impl AsciiPlot<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> AsciiPlot<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            width: 72,
            height: 16,
        }
    }

    /// Chart size in characters; each dimension is at least 2.
    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width.max(2);
        self.height = height.max(2);
        self
    }

    pub fn into_inner(self) -> Result<W, VisualizeError> {
        self.out
            .into_inner()
            .map_err(|_| VisualizeError::Output("writer lock poisoned".into()))
    }

    fn draw<D>(&self, result: &SimulationResult<D>, signal: &dyn Signal) -> Vec<Vec<u8>> {
        let time = result.time();
        let t_end = time[time.len() - 1];
        let columns: Vec<usize> = (0..self.width)
            .map(|c| {
                let t = t_end * c as f64 / (self.width - 1) as f64;
                time.partition_point(|x| *x < t).min(time.len() - 1)
            })
            .collect();

        let demand: Vec<f64> = columns.iter().map(|&i| signal.value(time[i])).collect();
        let base = result.base_energy();
        let peak = result.peak_energy();
        let series = [
            (b'd', demand),
            (b'b', columns.iter().map(|&i| base[i]).collect::<Vec<_>>()),
            (b'p', columns.iter().map(|&i| peak[i]).collect::<Vec<_>>()),
        ];

        let (mut lo, mut hi) = (0.0_f64, 0.0_f64);
        for (_, values) in &series {
            let (l, h) = bounds(values);
            lo = lo.min(l);
            hi = hi.max(h);
        }
        let span = if hi > lo { hi - lo } else { 1.0 };
        let row_of = |v: f64| {
            let frac = (hi - v) / span;
            ((frac * (self.height - 1) as f64).round() as usize).min(self.height - 1)
        };

        let mut grid = vec![vec![b' '; self.width]; self.height];
        let axis = row_of(0.0);
        grid[axis].iter_mut().for_each(|c| *c = b'-');
        for (mark, values) in &series {
            for (col, v) in values.iter().enumerate() {
                if v.is_finite() {
                    grid[row_of(*v)][col] = *mark;
                }
            }
        }
        grid
    }
}

impl<D, W: Write + Send> Visualizer<D> for AsciiPlot<W> {
    fn render(
        &self,
        result: &SimulationResult<D>,
        signal: &dyn Signal,
        _options: &OperationOptions,
    ) -> Result<(), VisualizeError> {
        if result.is_empty() {
            return Err(VisualizeError::Empty("result has no samples"));
        }
        let grid = self.draw(result, signal);
        let mut out = self
            .out
            .lock()
            .map_err(|_| VisualizeError::Output("writer lock poisoned".into()))?;
        writeln!(
            out,
            "{} | cut {} | {} | d=demand b=base p=peak",
            result.kind(),
            result.cut(),
            result.strategy()
        )?;
        for row in grid {
            out.write_all(&row)?;
            out.write_all(b"\n")?;
        }
        out.flush()?;
        Ok(())
    }
}

fn bounds(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        })
}

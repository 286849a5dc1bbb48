//! Independent runs over a range of cuts, in parallel.

use hs_controls::{ControlLawFactory, PairBuilder};
use hs_core::Strategy;
use hs_signal::SharedSignal;
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::error::OperationError;
use crate::operation::OperationSimulator;
use crate::result::SimulationResult;

/// One entry of a sweep; failures do not affect neighbouring cuts.
#[derive(Debug)]
pub struct SweepPoint<D> {
    pub cut: f64,
    pub outcome: Result<SimulationResult<D>, OperationError>,
}

/// Run one simulation per cut. Results come back in the order of `cuts`.
pub fn sweep_cuts<B, F>(
    sim: &OperationSimulator<B, F>,
    signal: &SharedSignal,
    cuts: &[f64],
    strategy: Option<Strategy>,
) -> Vec<SweepPoint<B::Descriptor>>
where
    B: PairBuilder,
    F: ControlLawFactory<B::Descriptor>,
{
    debug!(points = cuts.len(), "sweeping cuts");
    cuts.par_iter()
        .map(|&cut| SweepPoint {
            cut,
            outcome: sim.simulate(signal, cut, strategy),
        })
        .collect()
}

/// `points` cuts evenly spaced over `[0, 1]`, both ends included.
pub fn uniform_cuts(points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![0.5],
        n => (0..n).map(|i| i as f64 / (n - 1) as f64).collect(),
    }
}

/// Compact per-cut summary for tables and JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepSummary<D> {
    pub cut: f64,
    pub base: Option<D>,
    pub peak: Option<D>,
    pub samples: usize,
    pub error: Option<String>,
}

impl<D: Clone> From<&SweepPoint<D>> for SweepSummary<D> {
    fn from(point: &SweepPoint<D>) -> Self {
        match &point.outcome {
            Ok(r) => Self {
                cut: point.cut,
                base: Some(r.base().clone()),
                peak: Some(r.peak().clone()),
                samples: r.len(),
                error: None,
            },
            Err(e) => Self {
                cut: point.cut,
                base: None,
                peak: None,
                samples: 0,
                error: Some(e.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_cuts_cover_unit_interval() {
        assert!(uniform_cuts(0).is_empty());
        assert_eq!(uniform_cuts(1), vec![0.5]);
        assert_eq!(uniform_cuts(5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }
}

//! Recorded integration output.

use hs_core::{Tolerances, nearly_equal};

use crate::error::{SimError, SimResult};
use crate::model::{State, TimeSpan};

/// Time points and state snapshots produced by one solver run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trajectory {
    /// Time points (seconds), strictly increasing
    pub t: Vec<f64>,
    /// State snapshots, one per time point
    pub x: Vec<State>,
}

impl Trajectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            t: Vec::with_capacity(n),
            x: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, t: f64, x: State) {
        self.t.push(t);
        self.x.push(x);
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Last recorded time, if any.
    pub fn end_time(&self) -> Option<f64> {
        self.t.last().copied()
    }

    /// Check that the trajectory covers `span` and that every snapshot has
    /// dimension `dim`.
    ///
    /// Endpoints are compared with the default [`Tolerances`]; the solvers in
    /// this crate hit them exactly.
    pub fn validate(&self, span: TimeSpan, dim: usize) -> SimResult<()> {
        let fail = |what: String| Err(SimError::Trajectory { what });

        if self.is_empty() {
            return fail("trajectory is empty".to_string());
        }
        if self.t.len() != self.x.len() {
            return fail(format!(
                "{} time points but {} states",
                self.t.len(),
                self.x.len()
            ));
        }
        let tol = Tolerances::default();
        if !nearly_equal(self.t[0], span.start, tol) {
            return fail(format!("starts at {} instead of {}", self.t[0], span.start));
        }
        let last = self.t[self.t.len() - 1];
        if !nearly_equal(last, span.end, tol) {
            return fail(format!("ends at {} instead of {}", last, span.end));
        }
        if let Some(w) = self.t.windows(2).find(|w| w[1] <= w[0]) {
            return fail(format!("time not increasing: {} then {}", w[0], w[1]));
        }
        if let Some(x) = self.x.iter().find(|x| x.len() != dim) {
            return Err(SimError::DimensionMismatch {
                expected: dim,
                got: x.len(),
            });
        }
        if let Some(i) = self.x.iter().position(|x| x.iter().any(|v| !v.is_finite())) {
            return Err(SimError::NonFinite {
                what: "state",
                t: self.t[i],
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span() -> TimeSpan {
        TimeSpan::new(0.0, 1.0).unwrap()
    }

    #[test]
    fn valid_trajectory_passes() {
        let mut traj = Trajectory::new();
        traj.push(0.0, State::zeros(2));
        traj.push(0.5, State::zeros(2));
        traj.push(1.0, State::zeros(2));
        assert!(traj.validate(span(), 2).is_ok());
        assert_eq!(traj.end_time(), Some(1.0));
    }

    #[test]
    fn short_trajectory_fails() {
        let mut traj = Trajectory::new();
        traj.push(0.0, State::zeros(2));
        traj.push(0.9, State::zeros(2));
        assert!(matches!(
            traj.validate(span(), 2),
            Err(SimError::Trajectory { .. })
        ));
    }

    #[test]
    fn non_monotonic_time_fails() {
        let mut traj = Trajectory::new();
        traj.push(0.0, State::zeros(1));
        traj.push(0.6, State::zeros(1));
        traj.push(0.4, State::zeros(1));
        traj.push(1.0, State::zeros(1));
        assert!(traj.validate(span(), 1).is_err());
    }

    #[test]
    fn wrong_dimension_fails() {
        let mut traj = Trajectory::new();
        traj.push(0.0, State::zeros(2));
        traj.push(1.0, State::zeros(3));
        assert_eq!(
            traj.validate(span(), 2),
            Err(SimError::DimensionMismatch {
                expected: 2,
                got: 3
            })
        );
    }

    #[test]
    fn empty_trajectory_fails() {
        assert!(Trajectory::new().validate(span(), 2).is_err());
    }
}

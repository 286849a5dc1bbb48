//! Fixed-step time integrators.

use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::model::{Rhs, State, TimeSpan, ensure_finite_state, eval_rhs};
use crate::sim::{IntegratorSettings, OdeSolver};
use crate::trajectory::Trajectory;

/// One explicit step of a fixed-step method.
pub trait Stepper: Send + Sync {
    fn name(&self) -> &'static str;

    /// Advance `x` from `t` to `t + dt`.
    fn step(&self, rhs: &mut Rhs<'_>, t: f64, x: &State, dt: f64) -> SimResult<State>;
}

/// Classical RK4 (Runge-Kutta 4th order) integrator.
#[derive(Clone, Copy, Debug, Default)]
pub struct Rk4;

impl Stepper for Rk4 {
    fn name(&self) -> &'static str {
        "rk4"
    }

    fn step(&self, rhs: &mut Rhs<'_>, t: f64, x: &State, dt: f64) -> SimResult<State> {
        let k1 = eval_rhs(rhs, t, x)?;

        let x2 = x + &k1 * (0.5 * dt);
        let k2 = eval_rhs(rhs, t + 0.5 * dt, &x2)?;

        let x3 = x + &k2 * (0.5 * dt);
        let k3 = eval_rhs(rhs, t + 0.5 * dt, &x3)?;

        let x4 = x + &k3 * dt;
        let k4 = eval_rhs(rhs, t + dt, &x4)?;

        // x_new = x + (dt/6) * (k1 + 2*k2 + 2*k3 + k4)
        let k_sum = k1 + k2 * 2.0 + k3 * 2.0 + k4;
        Ok(x + k_sum * (dt / 6.0))
    }
}

/// Forward Euler (explicit, 1st order).
/// Calls rhs() once per step instead of 4 times (RK4).
#[derive(Clone, Copy, Debug, Default)]
pub struct ForwardEuler;

impl Stepper for ForwardEuler {
    fn name(&self) -> &'static str {
        "forward-euler"
    }

    fn step(&self, rhs: &mut Rhs<'_>, t: f64, x: &State, dt: f64) -> SimResult<State> {
        let xdot = eval_rhs(rhs, t, x)?;
        Ok(x + xdot * dt)
    }
}

/// Drives a [`Stepper`] over a whole span with step `settings.dt`.
///
/// Step `i` starts at `start + i * dt`; the last step is shortened so the
/// final time is exactly `span.end`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedStep<S>(pub S);

impl<S: Stepper> OdeSolver for FixedStep<S> {
    fn name(&self) -> &'static str {
        self.0.name()
    }

    fn solve(
        &self,
        rhs: &mut Rhs<'_>,
        span: TimeSpan,
        y0: &State,
        settings: &IntegratorSettings,
    ) -> SimResult<Trajectory> {
        span.validate()?;
        settings.validate()?;
        ensure_finite_state(y0, span.start)?;

        let n_steps = step_count(span.duration(), settings.dt);
        if n_steps > settings.max_steps {
            return Err(SimError::MaxSteps {
                max_steps: settings.max_steps,
                t: span.start,
            });
        }

        let mut record = Trajectory::with_capacity(n_steps / settings.record_every + 2);
        let mut x = y0.clone();
        record.push(span.start, x.clone());

        for step in 1..=n_steps {
            let t = span.start + (step - 1) as f64 * settings.dt;
            let t_next = if step == n_steps {
                span.end
            } else {
                span.start + step as f64 * settings.dt
            };
            x = self.0.step(rhs, t, &x, t_next - t)?;
            ensure_finite_state(&x, t_next)?;

            // Record if decimation matches; always record final state
            if step % settings.record_every == 0 || step == n_steps {
                record.push(t_next, x.clone());
            }
        }

        debug!(
            solver = self.0.name(),
            steps = n_steps,
            recorded = record.len(),
            "fixed-step integration finished"
        );
        Ok(record)
    }
}

/// Number of steps of size `dt` needed to cover `duration`, ignoring a
/// remainder below one part in 1e9 of a step.
fn step_count(duration: f64, dt: f64) -> usize {
    let ratio = duration / dt;
    (ratio - 1e-9).ceil().max(1.0) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn decay(_t: f64, x: &State) -> SimResult<State> {
        Ok(-x)
    }

    #[test]
    fn rk4_single_step_matches_exponential() {
        let x0 = State::from_vec(vec![1.0]);
        let x1 = Rk4.step(&mut decay, 0.0, &x0, 0.1).unwrap();
        assert_relative_eq!(x1[0], (-0.1_f64).exp(), epsilon = 1e-7);
    }

    #[test]
    fn euler_single_step() {
        let x0 = State::from_vec(vec![2.0]);
        let x1 = ForwardEuler.step(&mut decay, 0.0, &x0, 0.25).unwrap();
        assert_relative_eq!(x1[0], 1.5);
    }

    #[test]
    fn step_count_handles_remainders() {
        assert_eq!(step_count(1.0, 0.1), 10);
        assert_eq!(step_count(1.05, 0.1), 11);
        assert_eq!(step_count(0.01, 0.1), 1);
    }

    #[test]
    fn last_step_is_shortened_to_hit_end() {
        let span = TimeSpan::new(0.0, 1.05).unwrap();
        let settings = IntegratorSettings {
            dt: 0.1,
            ..Default::default()
        };
        let traj = FixedStep(Rk4)
            .solve(&mut decay, span, &State::from_vec(vec![1.0]), &settings)
            .unwrap();
        assert_eq!(traj.len(), 12);
        assert_eq!(traj.t[0], 0.0);
        assert_eq!(traj.end_time(), Some(1.05));
        assert_relative_eq!(traj.x[11][0], (-1.05_f64).exp(), epsilon = 1e-6);
    }

    #[test]
    fn decimation_keeps_final_point() {
        let span = TimeSpan::new(0.0, 1.0).unwrap();
        let settings = IntegratorSettings {
            dt: 0.1,
            record_every: 3,
            ..Default::default()
        };
        let traj = FixedStep(ForwardEuler)
            .solve(&mut decay, span, &State::from_vec(vec![1.0]), &settings)
            .unwrap();
        // t = 0, 0.3, 0.6, 0.9, 1.0
        assert_eq!(traj.len(), 5);
        assert_eq!(traj.end_time(), Some(1.0));
    }

    #[test]
    fn too_many_steps_fails_before_integrating() {
        let span = TimeSpan::new(0.0, 1.0).unwrap();
        let settings = IntegratorSettings {
            dt: 1e-3,
            max_steps: 10,
            ..Default::default()
        };
        let mut calls = 0;
        let mut rhs = |_t: f64, x: &State| {
            calls += 1;
            Ok(x.clone())
        };
        let err = FixedStep(Rk4)
            .solve(&mut rhs, span, &State::zeros(1), &settings)
            .unwrap_err();
        assert!(matches!(err, SimError::MaxSteps { max_steps: 10, .. }));
        assert_eq!(calls, 0);
    }
}

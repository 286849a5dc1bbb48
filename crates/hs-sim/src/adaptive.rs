//! Dormand-Prince 5(4) adaptive Runge-Kutta solver.
//!
//! Seven-stage, 5th order method with an embedded 4th order error estimate
//! (the method behind MATLAB's `ode45`). The last stage is evaluated at the
//! accepted point and reused as the first stage of the next step (FSAL).
//!
//! Step size control uses the max norm of the error scaled by
//! `atol + rtol * max(|y|, |y_new|)`, with safety factor 0.9 and a growth
//! factor limited to `[0.2, 5]`. Rejected steps are retried with a smaller
//! step; once the step falls below `min_step` the solve fails.

use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::model::{Rhs, State, TimeSpan, ensure_finite_state, eval_rhs};
use crate::sim::{IntegratorSettings, OdeSolver};
use crate::trajectory::Trajectory;

const C: [f64; 7] = [0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0, 1.0];

#[rustfmt::skip]
const A: [&[f64]; 7] = [
    &[],
    &[1.0/5.0],
    &[3.0/40.0, 9.0/40.0],
    &[44.0/45.0, -56.0/15.0, 32.0/9.0],
    &[19372.0/6561.0, -25360.0/2187.0, 64448.0/6561.0, -212.0/729.0],
    &[9017.0/3168.0, -355.0/33.0, 46732.0/5247.0, 49.0/176.0, -5103.0/18656.0],
    &[35.0/384.0, 0.0, 500.0/1113.0, 125.0/192.0, -2187.0/6784.0, 11.0/84.0],
];

// Difference between the 5th and 4th order weights
#[rustfmt::skip]
const E: [f64; 7] = [
    71.0/57600.0, 0.0, -71.0/16695.0, 71.0/1920.0, -17253.0/339200.0, 22.0/525.0, -1.0/40.0,
];

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 5.0;

/// Dormand-Prince 5(4) solver with adaptive step size.
#[derive(Clone, Copy, Debug, Default)]
pub struct DormandPrince45;

/// `y + h * Σ coef_i * k_i`
fn combine(y: &State, h: f64, coefs: &[f64], k: &[State]) -> State {
    let mut out = y.clone();
    for (c, ki) in coefs.iter().zip(k) {
        if *c != 0.0 {
            out.axpy(h * c, ki, 1.0);
        }
    }
    out
}

fn error_norm(y: &State, y_new: &State, err: &State, settings: &IntegratorSettings) -> f64 {
    y.iter()
        .zip(y_new.iter())
        .zip(err.iter())
        .map(|((a, b), e)| e.abs() / (settings.atol + settings.rtol * a.abs().max(b.abs())))
        .fold(0.0, f64::max)
}

impl OdeSolver for DormandPrince45 {
    fn name(&self) -> &'static str {
        "dormand-prince-45"
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

        let h_max = settings.max_step.unwrap_or(span.duration());
        let mut h = settings
            .initial_step
            .unwrap_or(0.01 * span.duration())
            .min(h_max)
            .max(settings.min_step);

        let mut t = span.start;
        let mut y = y0.clone();
        let mut k: Vec<State> = Vec::with_capacity(7);
        k.push(eval_rhs(rhs, t, &y)?);

        let mut record = Trajectory::new();
        record.push(t, y.clone());

        let mut accepted = 0usize;
        let mut rejected = 0usize;

        while t < span.end {
            if accepted + rejected >= settings.max_steps {
                return Err(SimError::MaxSteps {
                    max_steps: settings.max_steps,
                    t,
                });
            }

            // Land exactly on the end instead of leaving a sliver
            let last = t + h >= span.end - settings.min_step;
            if last {
                h = span.end - t;
            }

            k.truncate(1);
            for stage in 1..7 {
                let y_stage = combine(&y, h, A[stage], &k);
                k.push(eval_rhs(rhs, t + C[stage] * h, &y_stage)?);
            }
            let y_new = combine(&y, h, A[6], &k);
            ensure_finite_state(&y_new, t + h)?;
            let err = combine(&State::zeros(y.len()), h, &E, &k);
            let norm = error_norm(&y, &y_new, &err, settings);

            let factor = if norm == 0.0 {
                MAX_FACTOR
            } else {
                (SAFETY * norm.powf(-0.2)).clamp(MIN_FACTOR, MAX_FACTOR)
            };

            if norm <= 1.0 {
                t = if last { span.end } else { t + h };
                y = y_new;
                accepted += 1;
                // FSAL: last stage is the derivative at the accepted point
                let k_last = k.swap_remove(6);
                k.clear();
                k.push(k_last);

                if accepted % settings.record_every == 0 || t >= span.end {
                    record.push(t, y.clone());
                }
                h = (h * factor).min(h_max);
            } else {
                rejected += 1;
                h *= factor;
                if h < settings.min_step {
                    return Err(SimError::StepUnderflow {
                        t,
                        dt: h,
                        min_dt: settings.min_step,
                    });
                }
            }
        }

        debug!(
            solver = self.name(),
            accepted,
            rejected,
            recorded = record.len(),
            "adaptive integration finished"
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn decay(_t: f64, x: &State) -> SimResult<State> {
        Ok(-x)
    }

    #[test]
    fn exponential_decay_is_accurate() {
        let span = TimeSpan::new(0.0, 1.0).unwrap();
        let settings = IntegratorSettings {
            rtol: 1e-9,
            atol: 1e-12,
            ..Default::default()
        };
        let traj = DormandPrince45
            .solve(&mut decay, span, &State::from_vec(vec![1.0]), &settings)
            .unwrap();
        assert_eq!(traj.end_time(), Some(1.0));
        let last = traj.x.last().unwrap();
        assert_relative_eq!(last[0], (-1.0_f64).exp(), epsilon = 1e-8);
    }

    #[test]
    fn zero_derivative_grows_step_and_finishes() {
        let span = TimeSpan::new(0.0, 100.0).unwrap();
        let mut rhs = |_t: f64, x: &State| Ok(State::zeros(x.len()));
        let traj = DormandPrince45
            .solve(&mut rhs, span, &State::zeros(2), &IntegratorSettings::default())
            .unwrap();
        assert_eq!(traj.t[0], 0.0);
        assert_eq!(traj.end_time(), Some(100.0));
        assert!(traj.x.iter().all(|x| x.iter().all(|v| *v == 0.0)));
        // 1%, 5%, 25%, then the remainder
        assert!(traj.len() < 10);
    }

    #[test]
    fn combine_weights_stages() {
        let y = State::from_vec(vec![1.0, 1.0]);
        let k = vec![State::from_vec(vec![1.0, 0.0]), State::from_vec(vec![0.0, 2.0])];
        let out = combine(&y, 0.5, &[2.0, 1.0], &k);
        assert_eq!(out, State::from_vec(vec![2.0, 2.0]));
    }
}

//! The operation simulator: one period of a storage pair under a control law.

use std::fmt;
use std::time::Instant;

use hs_controls::{ClippingPairBuilder, ControlLawFactory, PairBuilder, SaturatingLawFactory};
use hs_core::{PAIR_DIM, Strategy};
use hs_signal::SharedSignal;
use hs_sim::{OdeSolver, SimError, SimResult, State};
use tracing::{info, warn};

use crate::error::OperationError;
use crate::options::OperationOptions;
use crate::resolve::{Resolved, resolve, resolve_token};
use crate::result::SimulationResult;
use crate::visualize::{LogVisualizer, Visualizer};

/// Simulates the operation of a base/peak storage pair over one period of a
/// demand signal.
///
/// The pair builder and the law factory are injected; descriptors flow from
/// one to the other and into the result without being inspected here.
pub struct OperationSimulator<B: PairBuilder, F> {
    builder: B,
    factory: F,
    options: OperationOptions,
    solver: Box<dyn OdeSolver>,
    visualizer: Box<dyn Visualizer<B::Descriptor>>,
}

impl OperationSimulator<ClippingPairBuilder, SaturatingLawFactory> {
    /// Simulator with the bundled clipping builder and saturating laws.
    pub fn standard(options: OperationOptions) -> Self {
        Self::new(ClippingPairBuilder, SaturatingLawFactory, options)
    }
}

impl<B, F> OperationSimulator<B, F>
where
    B: PairBuilder,
    F: ControlLawFactory<B::Descriptor>,
{
    /// Uses `options.continuous_solver` and logs a summary when plotting is
    /// enabled.
    pub fn new(builder: B, factory: F, options: OperationOptions) -> Self {
        Self {
            builder,
            factory,
            solver: Box::new(options.continuous_solver),
            options,
            visualizer: Box::new(LogVisualizer),
        }
    }

    /// Replace the integrator chosen by `options.continuous_solver`.
    pub fn with_solver(mut self, solver: impl OdeSolver + 'static) -> Self {
        self.solver = Box::new(solver);
        self
    }

    pub fn with_visualizer(mut self, visualizer: impl Visualizer<B::Descriptor> + 'static) -> Self {
        self.visualizer = Box::new(visualizer);
        self
    }

    pub fn options(&self) -> &OperationOptions {
        &self.options
    }

    /// Simulate one period of `signal` split at `cut`.
    ///
    /// A missing strategy means [`Strategy::Inter`]. Cut and period are
    /// checked before the builder or the factory is called.
    pub fn simulate(
        &self,
        signal: &SharedSignal,
        cut: f64,
        strategy: Option<Strategy>,
    ) -> Result<SimulationResult<B::Descriptor>, OperationError> {
        let resolved = resolve(signal.as_ref(), cut, strategy)?;
        self.run(signal, resolved)
    }

    /// Like [`simulate`](Self::simulate), with the strategy as a token.
    pub fn simulate_token(
        &self,
        signal: &SharedSignal,
        cut: f64,
        strategy: Option<&str>,
    ) -> Result<SimulationResult<B::Descriptor>, OperationError> {
        let resolved = resolve_token(signal.as_ref(), cut, strategy)?;
        self.run(signal, resolved)
    }

    fn run(
        &self,
        signal: &SharedSignal,
        Resolved {
            cut,
            strategy,
            span,
        }: Resolved,
    ) -> Result<SimulationResult<B::Descriptor>, OperationError> {
        let started = Instant::now();

        let pair = self
            .builder
            .build(signal, cut, strategy, &self.options.pair)?;
        let law = self.factory.build(
            cut,
            strategy,
            &pair.base,
            &pair.peak,
            &self.options.law,
        )?;

        let reference = pair.reference.as_ref();
        let mut rhs = |t: f64, y: &State| -> SimResult<State> {
            let dxdt = law.derivative(signal.value(t), reference.value(t), y);
            if dxdt.len() != PAIR_DIM {
                return Err(SimError::DimensionMismatch {
                    expected: PAIR_DIM,
                    got: dxdt.len(),
                });
            }
            Ok(dxdt)
        };

        let y0 = State::zeros(PAIR_DIM);
        let trajectory = self
            .solver
            .solve(&mut rhs, span, &y0, &self.options.integrator)?;
        trajectory.validate(span, PAIR_DIM)?;

        let result = SimulationResult::new(
            pair.base,
            pair.peak,
            signal.kind().to_owned(),
            cut,
            strategy,
            pair.reference,
            trajectory,
        );

        info!(
            kind = result.kind(),
            cut = cut.value(),
            %strategy,
            solver = self.solver.name(),
            samples = result.len(),
            elapsed_ms = started.elapsed().as_secs_f64() * 1e3,
            "operation simulated"
        );

        if self.options.plot_sim {
            if let Err(err) = self
                .visualizer
                .render(&result, signal.as_ref(), &self.options)
            {
                warn!(error = %err, "visualization failed; result unaffected");
            }
        }

        Ok(result)
    }
}

impl<B, F> fmt::Debug for OperationSimulator<B, F>
where
    B: PairBuilder + fmt::Debug,
    F: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationSimulator")
            .field("builder", &self.builder)
            .field("factory", &self.factory)
            .field("solver", &self.solver.name())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hs_signal::FnSignal;
    use hs_sim::SolverKind;
    use std::sync::Arc;

    #[test]
    fn custom_solver_replaces_configured_one() {
        let signal: SharedSignal = Arc::new(FnSignal::new("sine", 1.0, |t| (6.0 * t).sin()).unwrap());
        let sim = OperationSimulator::standard(OperationOptions::default())
            .with_solver(SolverKind::Rk4);
        let r = sim.simulate(&signal, 0.5, Some(Strategy::NoInter)).unwrap();
        // Rk4 records every fixed step of dt = 0.01
        assert_eq!(r.len(), 101);
        assert_eq!(r.time()[100], 1.0);
    }

    #[test]
    fn debug_names_solver() {
        let sim = OperationSimulator::standard(OperationOptions::default());
        assert!(format!("{sim:?}").contains("dormand-prince-45"));
    }
}

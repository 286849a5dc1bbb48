use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use hs_app::{
    AppResult, AsciiPlot, OperationError, OperationSimulator, Scenario, SweepSummary,
    load_scenario, sweep_cuts, uniform_cuts,
};
use hs_core::Strategy;
use hs_sim::SolverKind;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hs-cli")]
#[command(about = "Hybrid storage operation simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate scenario file syntax and settings
    Validate {
        /// Path to the scenario YAML file
        scenario_path: PathBuf,
    },
    /// Simulate one period of the scenario's demand
    Run {
        /// Path to the scenario YAML file
        scenario_path: PathBuf,
        /// Override the cut (fraction of peak demand served by the base unit)
        #[arg(long)]
        cut: Option<f64>,
        /// Override the strategy (inter or nointer)
        #[arg(long)]
        strategy: Option<String>,
        /// Override the solver (forward_euler, rk4 or dormand_prince)
        #[arg(long)]
        solver: Option<SolverKind>,
        /// Print a text chart of the run
        #[arg(long)]
        plot: bool,
        /// Write the result as JSON ("-" for stdout)
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Simulate a range of cuts in parallel
    Sweep {
        /// Path to the scenario YAML file
        scenario_path: PathBuf,
        /// Number of cuts evenly spaced over [0, 1]
        #[arg(long, default_value_t = 11)]
        points: usize,
        /// Override the strategy (inter or nointer)
        #[arg(long)]
        strategy: Option<String>,
        /// Write the per-cut summary as JSON ("-" for stdout)
        #[arg(long)]
        json: Option<PathBuf>,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Run {
            scenario_path,
            cut,
            strategy,
            solver,
            plot,
            json,
        } => cmd_run(
            &scenario_path,
            RunOverrides {
                cut,
                strategy,
                solver,
                plot,
            },
            json.as_deref(),
            Sinks::for_json(json.as_deref()),
        ),
        Commands::Sweep {
            scenario_path,
            points,
            strategy,
            json,
        } => cmd_sweep(
            &scenario_path,
            points,
            strategy,
            json.as_deref(),
            Sinks::for_json(json.as_deref()),
        ),
    }
}

struct RunOverrides {
    cut: Option<f64>,
    strategy: Option<String>,
    solver: Option<SolverKind>,
    plot: bool,
}

fn cmd_validate(scenario_path: &Path) -> AppResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = load_scenario(scenario_path)?;
    let signal = scenario.build_signal()?;
    println!("✓ Scenario is valid");
    println!("  Signal: {} (period {} s)", signal.kind(), signal.period());
    println!("  Cut: {}", scenario.cut);
    Ok(())
}

/// Strategy token for a run: the override if given, else the scenario's.
fn strategy_token(scenario: &Scenario, strategy: Option<String>) -> Option<String> {
    strategy.or_else(|| scenario.strategy.map(|s| s.token().to_string()))
}

/// Output sinks of one command. Status text and plots go to `console`,
/// which is stderr whenever JSON is written to stdout.
struct Sinks {
    stdout: Box<dyn Write + Send>,
    console: Box<dyn Write + Send>,
    plot: Box<dyn Write + Send>,
}

impl Sinks {
    fn for_json(json: Option<&Path>) -> Self {
        let console = || -> Box<dyn Write + Send> {
            if json_on_stdout(json) {
                Box::new(io::stderr())
            } else {
                Box::new(io::stdout())
            }
        };
        Self {
            stdout: Box::new(io::stdout()),
            console: console(),
            plot: console(),
        }
    }
}

fn json_on_stdout(json: Option<&Path>) -> bool {
    json == Some(Path::new("-"))
}

fn cmd_run(
    scenario_path: &Path,
    overrides: RunOverrides,
    json: Option<&Path>,
    mut sinks: Sinks,
) -> AppResult<()> {
    let mut scenario = load_scenario(scenario_path)?;
    if let Some(solver) = overrides.solver {
        scenario.options.continuous_solver = solver;
    }
    if overrides.plot {
        scenario.options.plot_sim = true;
    }
    let cut = overrides.cut.unwrap_or(scenario.cut);
    let strategy = strategy_token(&scenario, overrides.strategy);
    let signal = scenario.build_signal()?;

    let sim = OperationSimulator::standard(scenario.options.clone())
        .with_visualizer(AsciiPlot::new(sinks.plot));
    let console = &mut sinks.console;

    writeln!(
        console,
        "Running {} at cut {} ({})",
        signal.kind(),
        cut,
        strategy.as_deref().unwrap_or("inter")
    )?;
    let start = Instant::now();
    let result = sim.simulate_token(&signal, cut, strategy.as_deref())?;
    let elapsed = start.elapsed();

    writeln!(
        console,
        "✓ Simulation completed in {:.1} ms",
        elapsed.as_secs_f64() * 1e3
    )?;
    writeln!(console, "  Time points: {}", result.len())?;
    writeln!(
        console,
        "  Base unit: power {:.4}, energy {:.4}",
        result.base().power,
        result.base().energy
    )?;
    writeln!(
        console,
        "  Peak unit: power {:.4}, energy {:.4}",
        result.peak().power,
        result.peak().energy
    )?;
    if let Some(last) = result.final_state() {
        writeln!(
            console,
            "  Final offsets: base {:.4}, peak {:.4}",
            last[0], last[1]
        )?;
    }

    if let Some(path) = json {
        let content = result.export().to_json_pretty()?;
        write_output(path, &content, &mut sinks.stdout, console)?;
    }
    Ok(())
}

fn cmd_sweep(
    scenario_path: &Path,
    points: usize,
    strategy: Option<String>,
    json: Option<&Path>,
    mut sinks: Sinks,
) -> AppResult<()> {
    let scenario = load_scenario(scenario_path)?;
    let signal = scenario.build_signal()?;
    let strategy = match strategy_token(&scenario, strategy) {
        Some(token) => Some(token.parse::<Strategy>().map_err(OperationError::from)?),
        None => None,
    };

    let mut options = scenario.options.clone();
    options.plot_sim = false;
    let sim = OperationSimulator::standard(options);
    let console = &mut sinks.console;

    let cuts = uniform_cuts(points);
    writeln!(console, "Sweeping {} cuts for {}", cuts.len(), signal.kind())?;
    let start = Instant::now();
    let results = sweep_cuts(&sim, &signal, &cuts, strategy);
    writeln!(
        console,
        "✓ Sweep completed in {:.1} ms",
        start.elapsed().as_secs_f64() * 1e3
    )?;

    let summaries: Vec<SweepSummary<_>> = results.iter().map(SweepSummary::from).collect();
    writeln!(
        console,
        "  {:>6}  {:>10}  {:>10}  {:>10}  {:>10}",
        "cut", "P_base", "E_base", "P_peak", "E_peak"
    )?;
    for s in &summaries {
        match (&s.base, &s.peak, &s.error) {
            (Some(b), Some(p), _) => writeln!(
                console,
                "  {:>6.3}  {:>10.4}  {:>10.4}  {:>10.4}  {:>10.4}",
                s.cut, b.power, b.energy, p.power, p.energy
            )?,
            (_, _, Some(err)) => writeln!(console, "  {:>6.3}  failed: {}", s.cut, err)?,
            _ => {}
        }
    }

    if let Some(path) = json {
        let content = serde_json::to_string_pretty(&summaries)?;
        write_output(path, &content, &mut sinks.stdout, console)?;
    }
    Ok(())
}

fn write_output(
    path: &Path,
    content: &str,
    stdout: &mut dyn Write,
    console: &mut dyn Write,
) -> AppResult<()> {
    if json_on_stdout(Some(path)) {
        stdout.write_all(content.as_bytes())?;
        writeln!(stdout)?;
        stdout.flush()?;
    } else {
        std::fs::write(path, content)?;
        writeln!(console, "✓ Wrote {}", path.display())?;
    }
    Ok(())
}

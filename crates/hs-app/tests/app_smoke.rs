//! Smoke test: every demo scenario loads and runs.

use std::path::PathBuf;

use hs_app::{OperationSimulator, load_scenario};

#[test]
fn demo_scenarios_run() {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    dir.pop(); // go to crates
    dir.pop(); // go to repo root
    dir.push("demos");

    let mut entries: Vec<PathBuf> = std::fs::read_dir(&dir)
        .expect("demos directory")
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().is_some_and(|x| x == "yaml"))
        .collect();
    entries.sort();
    assert!(!entries.is_empty(), "no scenarios in {}", dir.display());

    for path in entries {
        let scenario = load_scenario(&path).unwrap_or_else(|e| panic!("{}: {e}", path.display()));
        let signal = scenario.build_signal().unwrap();
        let sim = OperationSimulator::standard(scenario.options.clone());
        let result = sim
            .simulate(&signal, scenario.cut, scenario.strategy)
            .unwrap_or_else(|e| panic!("{}: {e}", path.display()));
        assert_eq!(result.time()[result.len() - 1], signal.period());
        assert_eq!(result.strategy(), scenario.strategy.unwrap_or_default());
    }
}

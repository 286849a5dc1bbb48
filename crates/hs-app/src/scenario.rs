//! Scenario files: a demand signal plus the inputs of one run.

use std::path::Path;

use hs_core::Strategy;
use hs_signal::{SharedSignal, SignalSpec};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::options::OperationOptions;

/// A YAML scenario.
///
/// ```yaml
/// signal:
///   type: harmonic
///   period: 6.283185307179586
///   harmonics:
///     - { amplitude: 1.0, order: 1.0 }
///     - { amplitude: 2.0, order: 3.0 }
/// cut: 0.4
/// strategy: inter
/// options:
///   continuous_solver: dormand_prince
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub signal: SignalSpec,
    pub cut: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,
    #[serde(default)]
    pub options: OperationOptions,
}

impl Scenario {
    pub fn from_yaml(content: &str) -> AppResult<Self> {
        let scenario: Scenario = serde_yaml::from_str(content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Settings checks. Cut and strategy are left to the simulator, which
    /// reports them as invalid input.
    pub fn validate(&self) -> AppResult<()> {
        self.options
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))
    }

    pub fn build_signal(&self) -> AppResult<SharedSignal> {
        Ok(self.signal.clone().build()?)
    }
}

/// Load a scenario from a YAML file.
pub fn load_scenario(path: &Path) -> AppResult<Scenario> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::ScenarioRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    Scenario::from_yaml(&content)
}

/// Save a scenario to a YAML file.
pub fn save_scenario(path: &Path, scenario: &Scenario) -> AppResult<()> {
    std::fs::write(path, scenario.to_yaml()?)?;
    Ok(())
}

//! Scenario file configuration
//!
//! A scenario file is TOML with one `[model]` table shared by every run and
//! an ordered `[[scenarios]]` array:
//!
//! ```toml
//! output = "data/processed/sir_scenarios.csv"
//!
//! [model]
//! population = 1000000
//! beta = 0.3
//! gamma = 0.1
//! initial_infected = 10
//! horizon_days = 160
//! start_date = "2020-01-01"
//!
//! [[scenarios]]
//! label = "baseline_no_intervention"
//!
//! [[scenarios]]
//! label = "lockdown_day_30"
//! beta_rule = { kind = "step_change", after_day = 30, factor = 0.5 }
//!
//! [[scenarios]]
//! label = "vaccination_day_20"
//! intervention = { trigger_day = 20, fraction = 0.3 }
//! ```

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::calendar::default_start_date;
use crate::core::error::Result;
use crate::epidemic::params::ModelParameters;
use crate::epidemic::scenario::{BaseSetup, ScenarioSet, ScenarioSpec};
use crate::epidemic::simulation::{DEFAULT_HORIZON_DAYS, DEFAULT_SCENARIO};

/// Shared model block of a scenario file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Total population `N`; must be positive
    pub population: u64,

    /// Transmission coefficient
    ///
    /// Expected new infections per day are `beta * S * I / N`.
    pub beta: f64,

    /// Removal coefficient
    ///
    /// `1 / gamma` is the mean infectious period in days.
    pub gamma: f64,

    /// Infected head-count on day 0
    pub initial_infected: i64,

    /// Removed head-count on day 0
    #[serde(default)]
    pub initial_removed: i64,

    /// Number of simulated days (and records per scenario)
    #[serde(default = "default_horizon")]
    pub horizon_days: u32,

    /// Calendar date of day 0, used only to label records
    #[serde(default = "default_start")]
    pub start_date: Option<NaiveDate>,
}

fn default_horizon() -> u32 {
    DEFAULT_HORIZON_DAYS
}

fn default_start() -> Option<NaiveDate> {
    Some(default_start_date())
}

fn default_scenarios() -> Vec<ScenarioSpec> {
    vec![ScenarioSpec::baseline(DEFAULT_SCENARIO)]
}

impl ModelConfig {
    pub fn parameters(&self) -> Result<ModelParameters> {
        ModelParameters::new(self.population, self.beta, self.gamma)
    }
}

/// Parsed scenario file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioFile {
    /// Where the concatenated records go, relative to the working directory
    #[serde(default)]
    pub output: Option<PathBuf>,

    pub model: ModelConfig,

    /// Scenarios in output order; a lone baseline when omitted
    #[serde(default = "default_scenarios")]
    pub scenarios: Vec<ScenarioSpec>,
}

impl ScenarioFile {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validated scenario set ready to run
    pub fn into_scenario_set(self) -> Result<ScenarioSet> {
        let base = BaseSetup {
            parameters: self.model.parameters()?,
            initial_infected: self.model.initial_infected,
            initial_removed: self.model.initial_removed,
            horizon_days: self.model.horizon_days,
            start_date: self.model.start_date,
        };
        let set = ScenarioSet::new(base, self.scenarios);
        set.validate()?;
        Ok(set)
    }
}

//! Scenario comparison
//!
//! A scenario set shares one model setup and varies only the schedule
//! rules and intervention. Each scenario runs on its own fresh state, so
//! runs are independent and can go in parallel; output order still follows
//! declaration order.

use std::collections::HashSet;

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};
use crate::epidemic::intervention::InterventionEvent;
use crate::epidemic::output::{SimulationOutput, SimulationRecord};
use crate::epidemic::params::ModelParameters;
use crate::epidemic::schedule::ScheduleRule;
use crate::epidemic::simulation::{simulate, SimulationConfig};

/// Model setup shared by every scenario in a set
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BaseSetup {
    pub parameters: ModelParameters,
    pub initial_infected: i64,
    pub initial_removed: i64,
    pub horizon_days: u32,
    pub start_date: Option<NaiveDate>,
}

/// What distinguishes one scenario from another
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSpec {
    pub label: String,
    #[serde(default)]
    pub beta_rule: Option<ScheduleRule>,
    #[serde(default)]
    pub gamma_rule: Option<ScheduleRule>,
    #[serde(default)]
    pub intervention: Option<InterventionEvent>,
}

impl ScenarioSpec {
    pub fn baseline(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScenarioSet {
    pub base: BaseSetup,
    pub scenarios: Vec<ScenarioSpec>,
}

impl ScenarioSet {
    pub fn new(base: BaseSetup, scenarios: Vec<ScenarioSpec>) -> Self {
        Self { base, scenarios }
    }

    /// Full run configuration for one scenario
    pub fn config_for(&self, spec: &ScenarioSpec) -> SimulationConfig {
        SimulationConfig {
            parameters: self.base.parameters,
            initial_infected: self.base.initial_infected,
            initial_removed: self.base.initial_removed,
            horizon_days: self.base.horizon_days,
            start_date: self.base.start_date,
            beta_rule: spec.beta_rule.clone(),
            gamma_rule: spec.gamma_rule.clone(),
            intervention: spec.intervention,
            scenario: spec.label.clone(),
        }
    }

    /// Reject empty sets and duplicate labels
    pub fn validate(&self) -> Result<()> {
        if self.scenarios.is_empty() {
            return Err(SimError::Config("scenario set is empty".into()));
        }
        let mut seen = HashSet::new();
        for spec in &self.scenarios {
            if !seen.insert(spec.label.as_str()) {
                return Err(SimError::Config(format!(
                    "duplicate scenario label: {}",
                    spec.label
                )));
            }
        }
        Ok(())
    }

    /// Simulate every scenario, one output per scenario in declaration order
    pub fn run_each(&self) -> Result<Vec<SimulationOutput>> {
        self.validate()?;

        tracing::info!(scenarios = self.scenarios.len(), "Running scenario set");

        self.scenarios
            .par_iter()
            .map(|spec| simulate(&self.config_for(spec)))
            .collect()
    }

    /// Simulate every scenario and concatenate the records, tagged by label
    pub fn run(&self) -> Result<Vec<SimulationRecord>> {
        Ok(self
            .run_each()?
            .into_iter()
            .flat_map(SimulationOutput::into_records)
            .collect())
    }
}

/// Day-by-day difference between an intervention run and a baseline
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDelta {
    pub day: u32,
    pub date: Option<NaiveDate>,
    pub scenario: String,
    /// `I_scenario - I_baseline`
    pub infected_delta: f64,
    /// `R_scenario - R_baseline`
    pub removed_delta: f64,
}

/// Per-day differences of `other` against `baseline`
///
/// Both runs must cover the same number of days.
pub fn compare_to_baseline(
    baseline: &SimulationOutput,
    other: &SimulationOutput,
) -> Result<Vec<ScenarioDelta>> {
    if baseline.days() != other.days() {
        return Err(SimError::Config(format!(
            "cannot compare {} ({} days) with {} ({} days)",
            other.scenario,
            other.days(),
            baseline.scenario,
            baseline.days()
        )));
    }

    Ok(baseline
        .records
        .iter()
        .zip(&other.records)
        .map(|(base, run)| ScenarioDelta {
            day: run.day,
            date: run.date,
            scenario: run.scenario.clone(),
            infected_delta: run.infected - base.infected,
            removed_delta: run.removed - base.removed,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::epidemic::schedule::make_step_change;

    fn base() -> BaseSetup {
        BaseSetup {
            parameters: ModelParameters::new(1000, 0.3, 0.1).unwrap(),
            initial_infected: 10,
            initial_removed: 0,
            horizon_days: 50,
            start_date: None,
        }
    }

    fn lockdown() -> ScenarioSpec {
        ScenarioSpec {
            label: "lockdown".into(),
            beta_rule: Some(make_step_change(10, 0.5)),
            ..ScenarioSpec::default()
        }
    }

    #[test]
    fn test_run_concatenates_in_declaration_order() {
        let set = ScenarioSet::new(base(), vec![ScenarioSpec::baseline("baseline"), lockdown()]);
        let records = set.run().unwrap();
        assert_eq!(records.len(), 100);
        assert!(records[..50].iter().all(|r| r.scenario == "baseline"));
        assert!(records[50..].iter().all(|r| r.scenario == "lockdown"));
        assert_eq!(records[49].day, 49);
        assert_eq!(records[50].day, 0);
    }

    #[test]
    fn test_duplicate_labels_rejected() {
        let set = ScenarioSet::new(
            base(),
            vec![ScenarioSpec::baseline("a"), ScenarioSpec::baseline("a")],
        );
        assert!(matches!(set.run(), Err(SimError::Config(_))));
    }

    #[test]
    fn test_empty_set_rejected() {
        let set = ScenarioSet::new(base(), Vec::new());
        assert!(matches!(set.run(), Err(SimError::Config(_))));
    }

    #[test]
    fn test_invalid_base_fails_whole_set() {
        let mut setup = base();
        setup.horizon_days = 0;
        let set = ScenarioSet::new(setup, vec![ScenarioSpec::baseline("baseline")]);
        assert!(matches!(set.run(), Err(SimError::InvalidHorizon(0))));
    }

    #[test]
    fn test_lockdown_lowers_infections() {
        let set = ScenarioSet::new(base(), vec![ScenarioSpec::baseline("baseline"), lockdown()]);
        let outputs = set.run_each().unwrap();
        let deltas = compare_to_baseline(&outputs[0], &outputs[1]).unwrap();

        // Identical before the rule kicks in
        assert!(deltas[..10].iter().all(|d| d.infected_delta == 0.0));
        assert!(deltas[20].infected_delta < 0.0);
    }

    #[test]
    fn test_compare_requires_equal_lengths() {
        let short = simulate(&SimulationConfig::new(base().parameters, 10).with_horizon(5)).unwrap();
        let long = simulate(&SimulationConfig::new(base().parameters, 10).with_horizon(6)).unwrap();
        assert!(compare_to_baseline(&short, &long).is_err());
    }
}

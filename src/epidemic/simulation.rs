//! Main simulation loop

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::calendar::Calendar;
use crate::core::error::{Result, SimError};
use crate::epidemic::intervention::InterventionEvent;
use crate::epidemic::output::{SimulationOutput, SimulationRecord};
use crate::epidemic::params::{CompartmentState, ModelParameters};
use crate::epidemic::schedule::{effective_value, ScheduleRule};

/// Default horizon of a scenario run, in days
pub const DEFAULT_HORIZON_DAYS: u32 = 160;

/// Label used when a run is not given one
pub const DEFAULT_SCENARIO: &str = "baseline_no_intervention";

/// Configuration for a single scenario run
///
/// Every optional field is inert when absent:
/// - `start_date`: records carry no calendar date
/// - `beta_rule` / `gamma_rule`: the baseline rate is used every day
/// - `intervention`: no S to R transfer happens
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub parameters: ModelParameters,
    pub initial_infected: i64,
    pub initial_removed: i64,
    pub horizon_days: u32,
    pub start_date: Option<NaiveDate>,
    pub beta_rule: Option<ScheduleRule>,
    pub gamma_rule: Option<ScheduleRule>,
    pub intervention: Option<InterventionEvent>,
    pub scenario: String,
}

impl SimulationConfig {
    pub fn new(parameters: ModelParameters, initial_infected: i64) -> Self {
        Self {
            parameters,
            initial_infected,
            initial_removed: 0,
            horizon_days: DEFAULT_HORIZON_DAYS,
            start_date: None,
            beta_rule: None,
            gamma_rule: None,
            intervention: None,
            scenario: DEFAULT_SCENARIO.to_string(),
        }
    }

    pub fn with_initial_removed(mut self, removed: i64) -> Self {
        self.initial_removed = removed;
        self
    }

    pub fn with_horizon(mut self, days: u32) -> Self {
        self.horizon_days = days;
        self
    }

    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn with_beta_rule(mut self, rule: ScheduleRule) -> Self {
        self.beta_rule = Some(rule);
        self
    }

    pub fn with_gamma_rule(mut self, rule: ScheduleRule) -> Self {
        self.gamma_rule = Some(rule);
        self
    }

    pub fn with_intervention(mut self, event: InterventionEvent) -> Self {
        self.intervention = Some(event);
        self
    }

    pub fn with_scenario(mut self, label: impl Into<String>) -> Self {
        self.scenario = label.into();
        self
    }

    /// Check initial conditions and horizon; returns the validated counts
    pub fn validate(&self) -> Result<(u64, u64)> {
        if self.initial_infected < 0 || self.initial_removed < 0 {
            return Err(SimError::InvalidInitialCondition(format!(
                "initial infected ({}) and removed ({}) must be non-negative",
                self.initial_infected, self.initial_removed
            )));
        }

        let infected = self.initial_infected as u64;
        let removed = self.initial_removed as u64;
        let population = self.parameters.population();
        if u128::from(infected) + u128::from(removed) > u128::from(population) {
            return Err(SimError::InvalidInitialCondition(format!(
                "initial infected + removed ({}) exceeds population ({})",
                u128::from(infected) + u128::from(removed),
                population
            )));
        }

        if self.horizon_days < 1 {
            return Err(SimError::InvalidHorizon(self.horizon_days));
        }

        if let Some(start) = self.start_date {
            let last_day = self.horizon_days - 1;
            if Calendar::starting(start).date_for(last_day).is_none() {
                return Err(SimError::Config(format!(
                    "day {} after {} is past the last representable date",
                    last_day, start
                )));
            }
        }

        Ok((infected, removed))
    }
}

/// Run one scenario day by day and collect its records
///
/// Validation happens before any state exists, so an invalid config
/// yields an error and no records. Identical configs give identical output.
pub fn simulate(config: &SimulationConfig) -> Result<SimulationOutput> {
    let (infected, removed) = config.validate()?;

    let params = &config.parameters;
    let population = params.population() as f64;
    let calendar = Calendar::new(config.start_date);
    let mut state = CompartmentState::initial(params.population(), infected, removed)?;
    let mut records = Vec::with_capacity(config.horizon_days as usize);

    tracing::debug!(
        scenario = %config.scenario,
        days = config.horizon_days,
        "Starting simulation"
    );

    for day in 0..config.horizon_days {
        // 1. Effective parameters for today
        let beta = effective_value(config.beta_rule.as_ref(), day, params.beta());
        let gamma = effective_value(config.gamma_rule.as_ref(), day, params.gamma());

        // 2. One-shot transfer, before today's epidemic update
        if let Some(event) = config.intervention.filter(|e| e.is_due(day)) {
            let moved = state.transfer_susceptible_to_removed(event.effective_fraction());
            tracing::debug!(scenario = %config.scenario, day, moved, "Applied intervention");
        }

        // 3-4. Flows, capped at their source compartments
        let flows = state.flows(beta, gamma, population);
        if flows.clamped {
            tracing::warn!(
                scenario = %config.scenario,
                day,
                beta,
                gamma,
                "Daily flow exceeded its compartment and was clamped"
            );
        }

        // 5. Apply
        state.apply(&flows);

        // 6. Emit
        records.push(SimulationRecord {
            day,
            date: calendar.date_for(day),
            susceptible: state.susceptible,
            infected: state.infected,
            removed: state.removed,
            population: params.population(),
            beta,
            gamma,
            scenario: config.scenario.clone(),
        });
    }

    tracing::debug!(scenario = %config.scenario, records = records.len(), "Simulation finished");

    Ok(SimulationOutput::new(
        config.scenario.clone(),
        records,
        removed as f64,
    ))
}

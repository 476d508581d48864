//! Simulation records and per-run summaries

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::error::Result;

/// One emitted row per simulated day
///
/// Field names on the wire match the tabular layout consumed downstream:
/// `t_day,date,S,I,R,N,beta,gamma,scenario`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationRecord {
    #[serde(rename = "t_day")]
    pub day: u32,
    pub date: Option<NaiveDate>,
    #[serde(rename = "S")]
    pub susceptible: f64,
    #[serde(rename = "I")]
    pub infected: f64,
    #[serde(rename = "R")]
    pub removed: f64,
    #[serde(rename = "N")]
    pub population: u64,
    pub beta: f64,
    pub gamma: f64,
    pub scenario: String,
}

impl SimulationRecord {
    pub fn total(&self) -> f64 {
        self.susceptible + self.infected + self.removed
    }
}

/// Complete output of one scenario run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub scenario: String,
    pub records: Vec<SimulationRecord>,
    /// Removed count before day 0, used for attack rate
    pub initial_removed: f64,
}

impl SimulationOutput {
    pub fn new(scenario: String, records: Vec<SimulationRecord>, initial_removed: f64) -> Self {
        Self {
            scenario,
            records,
            initial_removed,
        }
    }

    pub fn days(&self) -> usize {
        self.records.len()
    }

    /// Highest infected count and the first day it occurs
    pub fn peak_infected(&self) -> Option<(u32, f64)> {
        self.records.iter().fold(None, |best, r| match best {
            Some((_, peak)) if peak >= r.infected => best,
            _ => Some((r.day, r.infected)),
        })
    }

    pub fn final_removed(&self) -> Option<f64> {
        self.records.last().map(|r| r.removed)
    }

    /// Share of the population that entered R during the run
    pub fn attack_rate(&self) -> Option<f64> {
        self.records
            .last()
            .map(|r| (r.removed - self.initial_removed) / r.population as f64)
    }

    pub fn into_records(self) -> Vec<SimulationRecord> {
        self.records
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn summary(&self) -> String {
        let (peak_day, peak) = self.peak_infected().unwrap_or((0, 0.0));
        format!(
            "[{}] {} days, peak infected {:.1} on day {}, final removed {:.1}, attack rate {:.1}%",
            self.scenario,
            self.days(),
            peak,
            peak_day,
            self.final_removed().unwrap_or(0.0),
            self.attack_rate().unwrap_or(0.0) * 100.0,
        )
    }
}

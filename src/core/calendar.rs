//! Calendar labelling for simulated days
//!
//! Days are plain 0-based indices inside the engine. A calendar only turns
//! an index into a date for output; it never influences the dynamics.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Maps day indices onto calendar dates from an optional start date
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    start: Option<NaiveDate>,
}

impl Calendar {
    pub fn new(start: Option<NaiveDate>) -> Self {
        Self { start }
    }

    pub fn starting(start: NaiveDate) -> Self {
        Self { start: Some(start) }
    }

    /// Date of `day`, or None when no start date was supplied
    ///
    /// Also None past `NaiveDate::MAX`. `SimulationConfig::validate` rejects
    /// horizons that would reach that far, so records from a dated run are
    /// always dated.
    pub fn date_for(&self, day: u32) -> Option<NaiveDate> {
        self.start
            .and_then(|start| start.checked_add_days(Days::new(u64::from(day))))
    }
}

/// Default start date of the reference scenario runs
pub fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or(NaiveDate::MIN)
}

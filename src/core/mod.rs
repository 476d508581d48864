pub mod calendar;
pub mod config;
pub mod error;

pub use calendar::Calendar;
pub use config::{ModelConfig, ScenarioFile};

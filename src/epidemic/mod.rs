//! Discrete-time SIR epidemic engine
//!
//! Advances susceptible / infected / removed head-counts one day at a time,
//! applying time-varying parameter schedules and one-shot interventions.
//! Runs are deterministic: the same configuration always produces the same
//! record sequence.

pub mod intervention;
pub mod output;
pub mod params;
pub mod scenario;
pub mod schedule;
pub mod simulation;

pub use intervention::InterventionEvent;
pub use output::{SimulationOutput, SimulationRecord};
pub use params::{CompartmentState, ModelParameters};
pub use scenario::{compare_to_baseline, BaseSetup, ScenarioDelta, ScenarioSet, ScenarioSpec};
pub use schedule::{make_step_change, ScheduleRule};
pub use simulation::{simulate, SimulationConfig};

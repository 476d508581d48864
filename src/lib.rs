//! SIR Scenarios - deterministic epidemic trajectories for intervention comparison

pub mod core;
pub mod data;
pub mod epidemic;
pub mod remote;

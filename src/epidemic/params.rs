//! Model parameters and compartment state

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};

/// Immutable SIR parameter set
///
/// Constructed only through [`ModelParameters::new`] (or deserialization,
/// which routes through it), so `population > 0` and non-negative finite
/// rates hold for every value in circulation. The simulator relies on this
/// and never re-checks it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawParameters", into = "RawParameters")]
pub struct ModelParameters {
    population: u64,
    beta: f64,
    gamma: f64,
}

impl ModelParameters {
    /// Validate and build a parameter set
    ///
    /// # Arguments
    /// * `population` - total head-count `N`, must be positive
    /// * `beta` - transmission coefficient, non-negative
    /// * `gamma` - removal/recovery coefficient, non-negative
    pub fn new(population: u64, beta: f64, gamma: f64) -> Result<Self> {
        if population == 0 {
            return Err(SimError::InvalidParameters(
                "population must be positive".into(),
            ));
        }
        check_rate("beta", beta)?;
        check_rate("gamma", gamma)?;

        Ok(Self {
            population,
            beta,
            gamma,
        })
    }

    pub fn population(&self) -> u64 {
        self.population
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Basic reproduction number `beta / gamma` (infinite when gamma is zero)
    pub fn basic_reproduction_number(&self) -> f64 {
        self.beta / self.gamma
    }
}

fn check_rate(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(SimError::InvalidParameters(format!(
            "{} must be a non-negative finite number, got {}",
            name, value
        )));
    }
    Ok(())
}

/// Wire form of [`ModelParameters`]
#[derive(Serialize, Deserialize)]
struct RawParameters {
    population: u64,
    beta: f64,
    gamma: f64,
}

impl TryFrom<RawParameters> for ModelParameters {
    type Error = SimError;

    fn try_from(raw: RawParameters) -> Result<Self> {
        ModelParameters::new(raw.population, raw.beta, raw.gamma)
    }
}

impl From<ModelParameters> for RawParameters {
    fn from(params: ModelParameters) -> Self {
        Self {
            population: params.population,
            beta: params.beta,
            gamma: params.gamma,
        }
    }
}

/// Per-run mutable head-counts
///
/// Values are reals: the discrete update accumulates fractional infections.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompartmentState {
    pub susceptible: f64,
    pub infected: f64,
    pub removed: f64,
}

/// Flows computed for a single day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyFlows {
    pub new_infections: f64,
    pub new_removals: f64,
    /// True when either flow had to be capped at its source compartment
    pub clamped: bool,
}

impl CompartmentState {
    /// Initial state with `S = N - I - R`
    ///
    /// Fails when `I + R` exceeds `N`.
    pub fn initial(population: u64, infected: u64, removed: u64) -> Result<Self> {
        let susceptible = population
            .checked_sub(infected)
            .and_then(|rest| rest.checked_sub(removed))
            .ok_or_else(|| {
                SimError::InvalidInitialCondition(format!(
                    "initial infected ({}) + removed ({}) exceeds population ({})",
                    infected, removed, population
                ))
            })?;

        Ok(Self {
            susceptible: susceptible as f64,
            infected: infected as f64,
            removed: removed as f64,
        })
    }

    pub fn total(&self) -> f64 {
        self.susceptible + self.infected + self.removed
    }

    /// Move `fraction` (clamped to [0, 1]) of S into R; returns the amount moved
    pub fn transfer_susceptible_to_removed(&mut self, fraction: f64) -> f64 {
        let moved = fraction.clamp(0.0, 1.0) * self.susceptible;
        self.susceptible -= moved;
        self.removed += moved;
        moved
    }

    /// Forward-Euler flows for one day, capped so no compartment goes negative
    pub fn flows(&self, beta: f64, gamma: f64, population: f64) -> DailyFlows {
        let raw_infections = beta * self.susceptible * self.infected / population;
        let raw_removals = gamma * self.infected;

        let new_infections = raw_infections.min(self.susceptible);
        let new_removals = raw_removals.min(self.infected);

        DailyFlows {
            new_infections,
            new_removals,
            clamped: new_infections < raw_infections || new_removals < raw_removals,
        }
    }

    pub fn apply(&mut self, flows: &DailyFlows) {
        self.susceptible -= flows.new_infections;
        self.infected += flows.new_infections - flows.new_removals;
        self.removed += flows.new_removals;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameters_reject_zero_population() {
        let result = ModelParameters::new(0, 0.3, 0.1);
        assert!(matches!(result, Err(SimError::InvalidParameters(_))));
    }

    #[test]
    fn test_parameters_reject_negative_or_nan_rates() {
        assert!(ModelParameters::new(100, -0.1, 0.1).is_err());
        assert!(ModelParameters::new(100, 0.3, -1.0).is_err());
        assert!(ModelParameters::new(100, f64::NAN, 0.1).is_err());
        assert!(ModelParameters::new(100, 0.3, f64::INFINITY).is_err());
    }

    #[test]
    fn test_parameters_accept_zero_rates() {
        let params = ModelParameters::new(100, 0.0, 0.0).unwrap();
        assert_eq!(params.population(), 100);
        assert_eq!(params.beta(), 0.0);
        assert_eq!(params.gamma(), 0.0);
    }

    #[test]
    fn test_parameters_deserialize_through_validation() {
        let ok: ModelParameters =
            serde_json::from_str(r#"{"population": 1000, "beta": 0.3, "gamma": 0.1}"#).unwrap();
        assert_eq!(ok.population(), 1000);

        let bad = serde_json::from_str::<ModelParameters>(
            r#"{"population": 0, "beta": 0.3, "gamma": 0.1}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_basic_reproduction_number() {
        let params = ModelParameters::new(1000, 0.3, 0.1).unwrap();
        assert!((params.basic_reproduction_number() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_initial_state_sums_to_population() {
        let state = CompartmentState::initial(1000, 10, 5).unwrap();
        assert_eq!(state.susceptible, 985.0);
        assert_eq!(state.infected, 10.0);
        assert_eq!(state.removed, 5.0);
        assert_eq!(state.total(), 1000.0);
    }

    #[test]
    fn test_initial_state_rejects_counts_above_population() {
        assert!(matches!(
            CompartmentState::initial(10, 8, 3),
            Err(SimError::InvalidInitialCondition(_))
        ));
        assert!(matches!(
            CompartmentState::initial(10, 11, 0),
            Err(SimError::InvalidInitialCondition(_))
        ));
        assert_eq!(CompartmentState::initial(10, 7, 3).unwrap().susceptible, 0.0);
    }

    #[test]
    fn test_transfer_clamps_fraction() {
        let mut state = CompartmentState::initial(100, 0, 0).unwrap();
        let moved = state.transfer_susceptible_to_removed(1.5);
        assert_eq!(moved, 100.0);
        assert_eq!(state.susceptible, 0.0);
        assert_eq!(state.removed, 100.0);

        let mut state = CompartmentState::initial(100, 0, 0).unwrap();
        assert_eq!(state.transfer_susceptible_to_removed(-0.5), 0.0);
        assert_eq!(state.susceptible, 100.0);
    }

    #[test]
    fn test_flows_are_capped_at_source() {
        let state = CompartmentState {
            susceptible: 10.0,
            infected: 90.0,
            removed: 0.0,
        };
        // beta * S * I / N = 50 * 10 * 90 / 100 = 450 > S
        let flows = state.flows(50.0, 2.0, 100.0);
        assert_eq!(flows.new_infections, 10.0);
        assert_eq!(flows.new_removals, 90.0);
        assert!(flows.clamped);
    }

    #[test]
    fn test_apply_conserves_total() {
        let mut state = CompartmentState::initial(1000, 10, 0).unwrap();
        let flows = state.flows(0.3, 0.1, 1000.0);
        assert!(!flows.clamped);
        state.apply(&flows);
        assert!((state.total() - 1000.0).abs() < 1e-9);
    }
}

//! One-shot intervention events

use serde::{Deserialize, Serialize};

/// Irreversible transfer of a share of S into R on a single day
/// (e.g. a vaccination campaign)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterventionEvent {
    pub trigger_day: u32,
    /// Share of the susceptible pool moved; clamped to [0, 1] when applied
    pub fraction: f64,
}

impl InterventionEvent {
    pub fn new(trigger_day: u32, fraction: f64) -> Self {
        Self {
            trigger_day,
            fraction,
        }
    }

    pub fn is_due(&self, day: u32) -> bool {
        day == self.trigger_day
    }

    /// Fraction actually applied; NaN moves nothing
    pub fn effective_fraction(&self) -> f64 {
        if self.fraction.is_nan() {
            0.0
        } else {
            self.fraction.clamp(0.0, 1.0)
        }
    }
}

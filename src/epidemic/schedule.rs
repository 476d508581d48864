//! Scenario scheduling rules
//!
//! A rule maps `(day, baseline)` to the value in effect on that day.
//! Rules carry no state, so the same inputs always give the same output
//! and they can be tested without running a simulation.

use serde::{Deserialize, Serialize};

/// Time-varying override for a single model parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleRule {
    /// `baseline` before `after_day`, `baseline * factor` from `after_day` on
    StepChange { after_day: u32, factor: f64 },
    /// `baseline * factor` for `start_day <= day < end_day`
    Window {
        start_day: u32,
        end_day: u32,
        factor: f64,
    },
    /// Each rule applied to the previous rule's output, in order
    Chain { rules: Vec<ScheduleRule> },
}

/// Build a step-change rule
///
/// No validation on `factor`: `< 1` models contact reduction on beta,
/// `> 1` models faster recovery on gamma.
pub fn make_step_change(after_day: u32, factor: f64) -> ScheduleRule {
    ScheduleRule::StepChange { after_day, factor }
}

impl ScheduleRule {
    /// Value in effect on `day` given the unscheduled `baseline`
    pub fn evaluate(&self, day: u32, baseline: f64) -> f64 {
        match self {
            ScheduleRule::StepChange { after_day, factor } => {
                if day >= *after_day {
                    baseline * factor
                } else {
                    baseline
                }
            }
            ScheduleRule::Window {
                start_day,
                end_day,
                factor,
            } => {
                if (*start_day..*end_day).contains(&day) {
                    baseline * factor
                } else {
                    baseline
                }
            }
            ScheduleRule::Chain { rules } => rules
                .iter()
                .fold(baseline, |value, rule| rule.evaluate(day, value)),
        }
    }

    /// Compose two rules; `self` runs first
    pub fn then(self, next: ScheduleRule) -> ScheduleRule {
        match self {
            ScheduleRule::Chain { mut rules } => {
                rules.push(next);
                ScheduleRule::Chain { rules }
            }
            first => ScheduleRule::Chain {
                rules: vec![first, next],
            },
        }
    }
}

/// Resolve a parameter for `day`, falling back to `baseline` without a rule
pub fn effective_value(rule: Option<&ScheduleRule>, day: u32, baseline: f64) -> f64 {
    rule.map_or(baseline, |r| r.evaluate(day, baseline))
}

//! Planner parameters — strategy loop control.
//!
//! [`PlannerParams`] groups the static parameters that bound the strategy
//! loops and decide what the driver does after a failed strategy. These are
//! application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Goal used when neither the command line nor the config file names one.
pub const DEFAULT_GOAL: &str = "Check current UTC time, then tell me the current weather in Madrid city, and finally use that information from the weather to create an image.";

/// What the driver does after a strategy fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop after the first failed strategy
    #[default]
    Abort,
    /// Report the failure and run the remaining strategies
    Continue,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Abort => write!(f, "abort"),
            FailurePolicy::Continue => write!(f, "continue"),
        }
    }
}

impl std::str::FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "abort" | "stop" => Ok(FailurePolicy::Abort),
            "continue" => Ok(FailurePolicy::Continue),
            _ => Err(format!("Invalid failure policy: {}", s)),
        }
    }
}

/// Strategy loop control parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerParams {
    /// Maximum ToolCall transitions for the stepwise planner.
    pub max_steps: usize,
    /// Maximum tool round-trips inside one auto-invoke completion.
    pub max_auto_invoke_rounds: usize,
    /// Whether the stepwise planner asks for an initial step list first.
    pub initial_plan: bool,
    pub failure_policy: FailurePolicy,
}

impl Default for PlannerParams {
    fn default() -> Self {
        Self {
            max_steps: 15,
            max_auto_invoke_rounds: 10,
            initial_plan: true,
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl PlannerParams {
    // ==================== Builder Methods ====================

    pub fn with_max_steps(mut self, max: usize) -> Self {
        self.max_steps = max;
        self
    }

    pub fn with_max_auto_invoke_rounds(mut self, max: usize) -> Self {
        self.max_auto_invoke_rounds = max;
        self
    }

    pub fn with_initial_plan(mut self, enabled: bool) -> Self {
        self.initial_plan = enabled;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = PlannerParams::default();
        assert_eq!(params.max_steps, 15);
        assert_eq!(params.max_auto_invoke_rounds, 10);
        assert!(params.initial_plan);
        assert_eq!(params.failure_policy, FailurePolicy::Abort);
    }

    #[test]
    fn test_builder() {
        let params = PlannerParams::default()
            .with_max_steps(3)
            .with_initial_plan(false)
            .with_failure_policy(FailurePolicy::Continue);

        assert_eq!(params.max_steps, 3);
        assert!(!params.initial_plan);
        assert_eq!(params.failure_policy, FailurePolicy::Continue);
    }

    #[test]
    fn test_failure_policy_from_str() {
        assert_eq!(
            "continue".parse::<FailurePolicy>().ok(),
            Some(FailurePolicy::Continue)
        );
        assert_eq!("ABORT".parse::<FailurePolicy>().ok(), Some(FailurePolicy::Abort));
        assert!("retry".parse::<FailurePolicy>().is_err());
    }
}

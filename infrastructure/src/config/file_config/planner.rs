//! Planner configuration from TOML (`[planner]` section)

use super::ConfigValidationError;
use orchestra_application::{DEFAULT_GOAL, FailurePolicy, PlannerParams};
use serde::{Deserialize, Serialize};

/// Raw planner configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePlannerConfig {
    /// Goal used when none is given on the command line
    pub goal: Option<String>,
    pub max_steps: usize,
    pub max_auto_invoke_rounds: usize,
    /// Ask the stepwise planner for an initial step list
    pub initial_plan: bool,
    pub failure_policy: FailurePolicy,
}

impl Default for FilePlannerConfig {
    fn default() -> Self {
        let params = PlannerParams::default();
        Self {
            goal: None,
            max_steps: params.max_steps,
            max_auto_invoke_rounds: params.max_auto_invoke_rounds,
            initial_plan: params.initial_plan,
            failure_policy: params.failure_policy,
        }
    }
}

impl FilePlannerConfig {
    /// Configured goal, falling back to the built-in demonstration goal.
    pub fn goal(&self) -> &str {
        self.goal
            .as_deref()
            .filter(|g| !g.trim().is_empty())
            .unwrap_or(DEFAULT_GOAL)
    }

    pub fn to_planner_params(&self) -> PlannerParams {
        PlannerParams::default()
            .with_max_steps(self.max_steps)
            .with_max_auto_invoke_rounds(self.max_auto_invoke_rounds)
            .with_initial_plan(self.initial_plan)
            .with_failure_policy(self.failure_policy)
    }

    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();
        if self.max_steps == 0 {
            issues.push(ConfigValidationError::ZeroValue("planner.max_steps"));
        }
        if self.max_auto_invoke_rounds == 0 {
            issues.push(ConfigValidationError::ZeroValue(
                "planner.max_auto_invoke_rounds",
            ));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_planner_params() {
        let config = FilePlannerConfig::default();
        assert_eq!(config.to_planner_params(), PlannerParams::default());
        assert_eq!(config.goal(), DEFAULT_GOAL);
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config: FilePlannerConfig = toml::from_str(
            r#"
initial_plan = false
goal = "   "
"#,
        )
        .unwrap();
        let params = config.to_planner_params();
        assert!(!params.initial_plan);
        assert_eq!(params.max_steps, 15);
        assert_eq!(config.goal(), DEFAULT_GOAL);
    }

    #[test]
    fn test_zero_steps_rejected() {
        let config = FilePlannerConfig {
            max_steps: 0,
            ..FilePlannerConfig::default()
        };
        assert_eq!(
            config.validate(),
            vec![ConfigValidationError::ZeroValue("planner.max_steps")]
        );
    }

    #[test]
    fn test_zero_auto_invoke_rounds_rejected() {
        let config = FilePlannerConfig {
            max_auto_invoke_rounds: 0,
            ..FilePlannerConfig::default()
        };
        assert_eq!(
            config.validate(),
            vec![ConfigValidationError::ZeroValue(
                "planner.max_auto_invoke_rounds"
            )]
        );

        let both = FilePlannerConfig {
            max_steps: 0,
            max_auto_invoke_rounds: 0,
            ..FilePlannerConfig::default()
        };
        assert_eq!(both.validate().len(), 2);
    }
}

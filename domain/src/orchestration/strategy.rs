//! Planning strategy kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three ways of driving capabilities toward a goal.
///
/// - **Stepwise**: the LLM chooses one capability call per turn, observing
///   each result before deciding the next.
/// - **TemplatePlan**: the LLM authors a whole plan up front; the plan is
///   compiled and executed without further model involvement.
/// - **AutoInvoke**: a single request with tools enabled; the chat service
///   runs its own tool-call loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    Stepwise,
    TemplatePlan,
    AutoInvoke,
}

impl StrategyKind {
    /// All strategies in demonstration order.
    pub fn all() -> [StrategyKind; 3] {
        [
            StrategyKind::Stepwise,
            StrategyKind::TemplatePlan,
            StrategyKind::AutoInvoke,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Stepwise => "stepwise",
            StrategyKind::TemplatePlan => "template-plan",
            StrategyKind::AutoInvoke => "auto-invoke",
        }
    }

    /// Heading used when presenting a run.
    pub fn display_name(&self) -> &'static str {
        match self {
            StrategyKind::Stepwise => "Function Calling Stepwise Planner",
            StrategyKind::TemplatePlan => "Template Plan Compiler",
            StrategyKind::AutoInvoke => "Single-Turn Auto-Invoke",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stepwise" | "step" => Ok(StrategyKind::Stepwise),
            "template-plan" | "template" | "plan" => Ok(StrategyKind::TemplatePlan),
            "auto-invoke" | "auto" => Ok(StrategyKind::AutoInvoke),
            _ => Err(format!("Invalid strategy: {}", s)),
        }
    }
}

//! Planning strategy trait
//!
//! Different strategies can be plugged into the driver to change how a goal
//! is turned into capability invocations.

use crate::error::StrategyError;
use crate::ports::progress::StrategyProgressNotifier;
use crate::registry::CapabilityRegistry;
use crate::use_cases::bridge::ToolCallBridge;
use async_trait::async_trait;
use orchestra_domain::{ExecutionTrace, StrategyKind};
use tokio_util::sync::CancellationToken;

/// Everything a strategy needs from the surrounding run.
pub struct RunContext<'a> {
    pub registry: &'a CapabilityRegistry,
    pub cancellation: &'a CancellationToken,
    pub progress: &'a dyn StrategyProgressNotifier,
}

impl<'a> RunContext<'a> {
    pub fn new(
        registry: &'a CapabilityRegistry,
        cancellation: &'a CancellationToken,
        progress: &'a dyn StrategyProgressNotifier,
    ) -> Self {
        Self {
            registry,
            cancellation,
            progress,
        }
    }

    /// Tool-call bridge bound to this run's registry and token.
    pub fn bridge(&self) -> ToolCallBridge<'a> {
        ToolCallBridge::new(self.registry, self.cancellation, self.progress)
    }
}

/// Trait for planning strategies
///
/// Implementations:
/// - StepwisePlanner: one capability call per model turn
/// - TemplatePlanCompiler: whole plan up front, executed without the model
/// - AutoInvokeStrategy: one request, tool loop inside the chat service
#[async_trait]
pub trait PlanningStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Drive `goal` to a final answer, appending every message to `trace`.
    async fn run(
        &self,
        goal: &str,
        ctx: &RunContext<'_>,
        trace: &mut ExecutionTrace,
    ) -> Result<String, StrategyError>;
}

//! Tool-call bridge
//!
//! Turns the LLM's tool-call requests into capability invocations. For each
//! request, in order: look up the capability, bind its arguments, invoke it
//! with the run's cancellation token, and append exactly one tool message
//! carrying the result. A failed invocation appends nothing and ends the
//! batch.

use crate::error::StrategyError;
use crate::ports::chat_service::ToolInvoker;
use crate::ports::progress::StrategyProgressNotifier;
use crate::registry::CapabilityRegistry;
use crate::use_cases::shared::{check_cancelled, preview};
use async_trait::async_trait;
use orchestra_domain::{ExecutionTrace, ToolCallRequest};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Executes tool-call requests against a [`CapabilityRegistry`].
pub struct ToolCallBridge<'a> {
    registry: &'a CapabilityRegistry,
    cancellation: &'a CancellationToken,
    progress: &'a dyn StrategyProgressNotifier,
}

impl<'a> ToolCallBridge<'a> {
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

    /// Execute a single request and record its result in `trace`.
    pub async fn invoke_one(
        &self,
        trace: &mut ExecutionTrace,
        call: &ToolCallRequest,
    ) -> Result<String, StrategyError> {
        check_cancelled(self.cancellation)?;

        let capability = self.registry.get(&call.capability)?;
        let args = capability.descriptor().bind(&call.arguments)?;

        info!(capability = %call.capability, id = %call.id, "Invoking capability");
        self.progress.on_tool_call(&call.capability);

        let result = capability.invoke(&args, self.cancellation).await;
        self.progress.on_tool_result(&call.capability, result.is_ok());

        let output = match result {
            Ok(output) => output,
            Err(e) => {
                warn!(capability = %call.capability, "Capability failed: {}", e);
                return Err(e.into());
            }
        };

        debug!(
            capability = %call.capability,
            "Capability returned: {}",
            preview(&output, 120)
        );
        trace.record_tool_result(&call.id, output.clone())?;
        Ok(output)
    }
}

#[async_trait]
impl ToolInvoker for ToolCallBridge<'_> {
    async fn invoke_all(
        &self,
        trace: &mut ExecutionTrace,
        calls: &[ToolCallRequest],
    ) -> Result<Vec<String>, StrategyError> {
        let mut outputs = Vec::with_capacity(calls.len());
        for call in calls {
            outputs.push(self.invoke_one(trace, call).await?);
        }
        Ok(outputs)
    }
}

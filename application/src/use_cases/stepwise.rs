//! Stepwise function-calling planner
//!
//! State machine `Thinking → (ToolCall → Thinking)* → Done`:
//!
//! 1. Optionally ask the model (no tools) for a short list of steps
//! 2. Seed the trace with a system message (tools, goal, initial steps) and
//!    the goal as the first user message
//! 3. **Thinking**: send the whole trace plus the tool list
//! 4. **ToolCall**: the reply requested capabilities; run them through the
//!    bridge and go back to Thinking
//! 5. **Done**: the reply is plain text, or a call to `send_final_answer`
//!
//! The number of ToolCall transitions is bounded by
//! [`PlannerParams::max_steps`]; a tool-call request past the bound ends the
//! run with `PlannerExhausted`.

use crate::config::PlannerParams;
use crate::error::StrategyError;
use crate::ports::chat_service::{ChatRequest, ChatService, LlmServiceError, ToolInvoker};
use crate::use_cases::shared::{cancellable, check_cancelled, preview};
use crate::use_cases::strategy::{PlanningStrategy, RunContext};
use async_trait::async_trait;
use orchestra_domain::{
    CapabilityDescriptor, ExecutionTrace, Message, ParamType, ParameterSpec, StrategyKind,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Planner-owned tool that ends the run with the given answer.
pub const FINAL_ANSWER_TOOL: &str = "send_final_answer";

fn final_answer_descriptor() -> CapabilityDescriptor {
    CapabilityDescriptor::new(
        FINAL_ANSWER_TOOL,
        "Sends the final answer to the user once the goal has been fully achieved",
    )
    .with_parameter(
        ParameterSpec::new("answer", ParamType::String)
            .with_description("The final answer, written for the user"),
    )
}

pub struct StepwisePlanner {
    chat: Arc<dyn ChatService>,
    params: PlannerParams,
}

impl StepwisePlanner {
    pub fn new(chat: Arc<dyn ChatService>, params: PlannerParams) -> Self {
        Self { chat, params }
    }

    async fn initial_plan(
        &self,
        goal: &str,
        tools: &[CapabilityDescriptor],
        ctx: &RunContext<'_>,
    ) -> Result<Option<String>, StrategyError> {
        let request = ChatRequest::new(vec![
            Message::system(initial_plan_prompt(tools)),
            Message::user(goal),
        ]);
        let reply = match cancellable(ctx.cancellation, self.chat.complete(request))
            .await
            .ok_or(StrategyError::Cancelled)?
        {
            Ok(reply) => reply,
            Err(LlmServiceError::EmptyResponse) => Message::assistant(""),
            Err(e) => return Err(e.into()),
        };

        let steps = reply.text().trim();
        if steps.is_empty() {
            warn!("Model returned no initial plan, continuing without one");
            return Ok(None);
        }
        debug!("Initial plan: {}", preview(steps, 300));
        Ok(Some(steps.to_string()))
    }
}

fn tool_list(tools: &[CapabilityDescriptor]) -> String {
    tools
        .iter()
        .map(|t| {
            let params = t
                .parameters
                .iter()
                .map(|p| format!("{}: {}", p.name, p.param_type))
                .collect::<Vec<_>>()
                .join(", ");
            format!("- {}({}): {}", t.name, params, t.description)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn initial_plan_prompt(tools: &[CapabilityDescriptor]) -> String {
    format!(
        "You are a planner. Given the goal in the next message, write a short numbered list \
         of the steps needed to achieve it using only these functions:\n\n{}\n\n\
         Do not execute anything and do not answer the goal yet.",
        tool_list(tools)
    )
}

fn system_prompt(goal: &str, tools: &[CapabilityDescriptor], initial_plan: Option<&str>) -> String {
    let mut prompt = format!(
        "Original request: {goal}\n\n\
         You are in the process of helping the user fulfil this request using the following functions:\n\n{}\n\n\
         Call one function at a time and use the results to decide the next step. \
         When the request has been fulfilled, call {FINAL_ANSWER_TOOL} with your answer.",
        tool_list(tools)
    );
    if let Some(plan) = initial_plan {
        prompt.push_str("\n\nSuggested steps:\n");
        prompt.push_str(plan);
    }
    prompt
}

/// Answer carried by a `send_final_answer` call, if the reply contains one.
fn final_answer(reply: &Message) -> Result<Option<String>, StrategyError> {
    let Some(call) = reply
        .tool_calls
        .iter()
        .find(|c| c.capability == FINAL_ANSWER_TOOL)
    else {
        return Ok(None);
    };
    let args = final_answer_descriptor().bind(&call.arguments)?;
    Ok(Some(args.require_str("answer")?.trim().to_string()))
}

#[async_trait]
impl PlanningStrategy for StepwisePlanner {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Stepwise
    }

    async fn run(
        &self,
        goal: &str,
        ctx: &RunContext<'_>,
        trace: &mut ExecutionTrace,
    ) -> Result<String, StrategyError> {
        let tools = ctx.registry.descriptors();

        let initial_plan = if self.params.initial_plan {
            self.initial_plan(goal, &tools, ctx).await?
        } else {
            None
        };

        trace.push_system(system_prompt(goal, &tools, initial_plan.as_deref()));
        trace.push_user(goal);

        let mut offered = tools;
        offered.push(final_answer_descriptor());

        let bridge = ctx.bridge();
        let mut transitions = 0;

        loop {
            check_cancelled(ctx.cancellation)?;

            // Thinking
            let request = ChatRequest::new(trace.messages().to_vec()).with_tools(offered.clone());
            let reply = cancellable(ctx.cancellation, self.chat.complete(request))
                .await
                .ok_or(StrategyError::Cancelled)??;

            if reply.has_tool_calls() {
                if let Some(answer) = final_answer(&reply)? {
                    info!("Stepwise planner done after {} tool step(s)", transitions);
                    trace.push_assistant(Message::assistant(answer.clone()))?;
                    return Ok(answer);
                }

                if transitions >= self.params.max_steps {
                    warn!(
                        "Stepwise planner exceeded {} steps",
                        self.params.max_steps
                    );
                    return Err(StrategyError::PlannerExhausted(self.params.max_steps));
                }

                // ToolCall
                transitions += 1;
                debug!(
                    "Step {}: {} tool call(s)",
                    transitions,
                    reply.tool_calls.len()
                );
                trace.push_assistant(reply.clone())?;
                bridge.invoke_all(trace, &reply.tool_calls).await?;
                continue;
            }

            // Done
            let answer = reply.text().trim().to_string();
            if answer.is_empty() {
                return Err(LlmServiceError::EmptyResponse.into());
            }
            info!("Stepwise planner done after {} tool step(s)", transitions);
            trace.push_assistant(reply)?;
            return Ok(answer);
        }
    }
}

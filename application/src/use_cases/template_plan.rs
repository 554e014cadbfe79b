//! Template plan compiler
//!
//! Two phases:
//!
//! 1. **Compile**: one request (no tools) asking the model for a JSON plan;
//!    the reply is parsed, reference-checked and checked against the
//!    registry. Any defect is a `PlanParse` error before anything runs.
//! 2. **Execute**: steps run top to bottom through the bridge with no model
//!    round-trips. Each step's arguments are resolved from the slots
//!    produced so far, and its output fills its own slot.
//!
//! The final answer is the rendered `result` template, or the last step's
//! output when the plan has none.

use crate::error::StrategyError;
use crate::ports::chat_service::{ChatRequest, ChatService};
use crate::use_cases::shared::{cancellable, check_cancelled};
use crate::use_cases::strategy::{PlanningStrategy, RunContext};
use async_trait::async_trait;
use orchestra_domain::{
    CapabilityDescriptor, ExecutionTrace, Message, Plan, PlanParseError, PlanStep, StrategyKind,
    ToolCallRequest, parse_plan,
};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

pub struct TemplatePlanCompiler {
    chat: Arc<dyn ChatService>,
}

impl TemplatePlanCompiler {
    pub fn new(chat: Arc<dyn ChatService>) -> Self {
        Self { chat }
    }

    /// Ask the model for a plan and compile it against the registry.
    async fn compile(
        &self,
        goal: &str,
        ctx: &RunContext<'_>,
        trace: &mut ExecutionTrace,
    ) -> Result<Plan, StrategyError> {
        let tools = ctx.registry.descriptors();
        trace.push_system(compile_prompt(&tools));
        trace.push_user(goal);

        let request = ChatRequest::new(trace.messages().to_vec());
        let reply = cancellable(ctx.cancellation, self.chat.complete(request))
            .await
            .ok_or(StrategyError::Cancelled)??;

        let plan = parse_plan(reply.text())?;
        plan.check_capabilities(|name| ctx.registry.contains(name))?;
        info!("Compiled plan with {} step(s)", plan.steps.len());

        trace.push_assistant(Message::assistant(format!("The plan is:\n\n{plan}")))?;
        Ok(plan)
    }
}

fn compile_prompt(tools: &[CapabilityDescriptor]) -> String {
    let schema = tools
        .iter()
        .map(|t| {
            let params = t
                .parameters
                .iter()
                .map(|p| format!("\"{}\": {}", p.name, p.param_type))
                .collect::<Vec<_>>()
                .join(", ");
            format!("- {} {{{}}}: {}", t.name, params, t.description)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a planner. Write a plan that achieves the user's goal using only these functions:\n\n\
         {schema}\n\n\
         Reply with a single ```plan fenced block containing JSON of this shape:\n\n\
         ```plan\n\
         {{\n  \"steps\": [\n    {{\"capability\": \"<function>\", \"arguments\": {{\"<name>\": \"<value>\"}}, \"output\": \"<slot>\"}}\n  ],\n  \"result\": \"<final answer template>\"\n}}\n\
         ```\n\n\
         An argument value or the result may reference the output of an earlier step as {{{{slot}}}}. \
         A step may only reference slots produced by the steps before it."
    )
}

/// Resolve a step's bindings against the slots produced so far.
fn resolve_arguments(
    index: usize,
    step: &PlanStep,
    slots: &HashMap<String, String>,
) -> Result<Value, PlanParseError> {
    let mut arguments = Map::new();
    for (name, binding) in &step.arguments {
        let value = binding.resolve(slots).ok_or_else(|| {
            let missing = binding
                .references()
                .into_iter()
                .find(|slot| !slots.contains_key(*slot))
                .unwrap_or_default();
            PlanParseError::DanglingReference {
                at: format!("step {}", index + 1),
                slot: missing.to_string(),
            }
        })?;
        arguments.insert(name.clone(), value);
    }
    Ok(Value::Object(arguments))
}

#[async_trait]
impl PlanningStrategy for TemplatePlanCompiler {
    fn kind(&self) -> StrategyKind {
        StrategyKind::TemplatePlan
    }

    async fn run(
        &self,
        goal: &str,
        ctx: &RunContext<'_>,
        trace: &mut ExecutionTrace,
    ) -> Result<String, StrategyError> {
        let plan = self.compile(goal, ctx, trace).await?;

        let bridge = ctx.bridge();
        let mut slots: HashMap<String, String> = HashMap::new();

        for (index, step) in plan.steps.iter().enumerate() {
            check_cancelled(ctx.cancellation)?;

            let call = ToolCallRequest::new(
                format!("plan_step_{}", index + 1),
                &step.capability,
                resolve_arguments(index, step, &slots)?,
            );
            debug!("Executing plan step {}: {}", index + 1, step.capability);

            trace.push_assistant(Message::assistant_tool_calls(None, vec![call.clone()]))?;
            let output = bridge.invoke_one(trace, &call).await?;
            slots.insert(step.output.clone(), output);
        }

        let answer = plan.render_result(&slots).ok_or_else(|| {
            PlanParseError::DanglingReference {
                at: "result".to_string(),
                slot: plan.terminal_slot().unwrap_or_default().to_string(),
            }
        })?;

        trace.push_assistant(Message::assistant(answer.clone()))?;
        Ok(answer)
    }
}

//! Single-turn auto-invoke
//!
//! One outbound call with the full tool set; the chat service resolves tool
//! calls itself (through the bridge, so every round-trip still lands in the
//! trace) and returns one final message.

use crate::config::PlannerParams;
use crate::error::StrategyError;
use crate::ports::chat_service::{ChatService, LlmServiceError, SamplingOptions};
use crate::use_cases::shared::cancellable;
use crate::use_cases::strategy::{PlanningStrategy, RunContext};
use async_trait::async_trait;
use orchestra_domain::{ExecutionTrace, StrategyKind};
use std::sync::Arc;
use tracing::info;

pub struct AutoInvokeStrategy {
    chat: Arc<dyn ChatService>,
    params: PlannerParams,
}

impl AutoInvokeStrategy {
    pub fn new(chat: Arc<dyn ChatService>, params: PlannerParams) -> Self {
        Self { chat, params }
    }
}

#[async_trait]
impl PlanningStrategy for AutoInvokeStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::AutoInvoke
    }

    async fn run(
        &self,
        goal: &str,
        ctx: &RunContext<'_>,
        trace: &mut ExecutionTrace,
    ) -> Result<String, StrategyError> {
        trace.push_user(goal);

        let tools = ctx.registry.descriptors();
        let bridge = ctx.bridge();
        let reply = cancellable(
            ctx.cancellation,
            self.chat.complete_with_auto_invoke(
                trace,
                &tools,
                SamplingOptions::default(),
                &bridge,
                self.params.max_auto_invoke_rounds,
            ),
        )
        .await
        .ok_or(StrategyError::Cancelled)??;

        let answer = reply.text().trim().to_string();
        if answer.is_empty() {
            return Err(LlmServiceError::EmptyResponse.into());
        }
        info!(
            "Auto-invoke done after {} tool call(s)",
            trace.tool_call_count()
        );
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::progress::NoProgress;
    use crate::test_support::{
        FIXED_TIME, IMAGE_RESULT, MockChat, WEATHER_SUMMARY, city, demo_capabilities,
        registry_with_failing_image, tool_call_reply, tool_call_with_args,
    };
    use orchestra_domain::{Message, Role, ToolCallRequest};
    use serde_json::{Value, json};
    use tokio_util::sync::CancellationToken;

    #[tokio::test]
    async fn test_single_request_resolves_all_tools() {
        let chat = Arc::new(MockChat::new(vec![
            Message::assistant_tool_calls(
                None,
                vec![
                    ToolCallRequest::new("call_1", "get_current_utc_time", Value::Null),
                    ToolCallRequest::new("call_2", "get_weather_for_city", city("Madrid")),
                ],
            ),
            tool_call_with_args(
                "call_3",
                "create_image_from_text",
                json!({"description": "Madrid"}),
            ),
            Message::assistant(format!("At {FIXED_TIME}: {WEATHER_SUMMARY} {IMAGE_RESULT}")),
        ]));
        let registry = demo_capabilities().registry();
        let token = CancellationToken::new();
        let ctx = RunContext::new(&registry, &token, &NoProgress);
        let mut trace = ExecutionTrace::new();

        let answer = AutoInvokeStrategy::new(chat.clone(), PlannerParams::default())
            .run(crate::config::DEFAULT_GOAL, &ctx, &mut trace)
            .await
            .unwrap();

        assert!(answer.contains(WEATHER_SUMMARY));
        assert_eq!(trace.tool_call_count(), 3);
        assert_eq!(trace.messages()[0].role, Role::User);
        assert_eq!(trace.last().map(|m| m.role), Some(Role::Assistant));
        assert!(chat.requests().iter().all(|r| r.tools.len() == 3));
    }

    #[tokio::test]
    async fn test_image_failure_propagates() {
        let chat = Arc::new(MockChat::new(vec![tool_call_with_args(
            "call_1",
            "create_image_from_text",
            json!({"description": "Madrid"}),
        )]));
        let registry = registry_with_failing_image();
        let token = CancellationToken::new();
        let ctx = RunContext::new(&registry, &token, &NoProgress);
        let mut trace = ExecutionTrace::new();

        let err = AutoInvokeStrategy::new(chat, PlannerParams::default())
            .run("Draw Madrid", &ctx, &mut trace)
            .await
            .unwrap_err();

        assert!(matches!(err, StrategyError::ImageGeneration(_)));
        assert_eq!(trace.tool_call_count(), 0);
    }

    #[tokio::test]
    async fn test_round_limit_forces_text_answer() {
        let chat = Arc::new(MockChat::new(vec![
            tool_call_reply("call_1", "get_current_utc_time"),
            Message::assistant("It is midnight."),
        ]));
        let registry = demo_capabilities().registry();
        let token = CancellationToken::new();
        let ctx = RunContext::new(&registry, &token, &NoProgress);
        let mut trace = ExecutionTrace::new();

        let params = PlannerParams::default().with_max_auto_invoke_rounds(1);
        let answer = AutoInvokeStrategy::new(chat.clone(), params)
            .run("What time is it?", &ctx, &mut trace)
            .await
            .unwrap();

        assert_eq!(answer, "It is midnight.");
        assert!(chat.requests()[1].tools.is_empty());
    }
}

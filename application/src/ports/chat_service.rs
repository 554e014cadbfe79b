//! LLM chat service port
//!
//! Defines the interface for sending a conversation (optionally with tool
//! declarations) to a chat-completion model, plus the auto-invoke loop that
//! lets the service resolve tool calls within a single turn.

use crate::error::StrategyError;
use async_trait::async_trait;
use orchestra_domain::{CapabilityDescriptor, ExecutionTrace, Message, ToolCallRequest};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur while talking to the chat service
#[derive(Error, Debug)]
pub enum LlmServiceError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Authentication rejected: {0}")]
    Auth(String),

    #[error("Chat service returned status {code}: {body}")]
    Status { code: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Model returned an empty response")]
    EmptyResponse,
}

/// Sampling parameters for a single completion.
///
/// Unset fields are left to the service's defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SamplingOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
}

impl SamplingOptions {
    pub fn new(max_tokens: u32, temperature: f32, top_p: f32) -> Self {
        Self {
            max_tokens: Some(max_tokens),
            temperature: Some(temperature),
            top_p: Some(top_p),
        }
    }
}

/// One request to the chat service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    /// Capabilities the model may call; empty disables tool calling
    pub tools: Vec<CapabilityDescriptor>,
    pub options: SamplingOptions,
}

impl ChatRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }

    /// Single user prompt with no tools.
    pub fn prompt(content: impl Into<String>) -> Self {
        Self::new(vec![Message::user(content)])
    }

    pub fn with_tools(mut self, tools: Vec<CapabilityDescriptor>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_options(mut self, options: SamplingOptions) -> Self {
        self.options = options;
        self
    }
}

/// Executes tool-call requests on behalf of the chat service.
///
/// Implementations append exactly one tool message per successful request
/// to the trace and return the outputs in request order.
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    async fn invoke_all(
        &self,
        trace: &mut ExecutionTrace,
        calls: &[ToolCallRequest],
    ) -> Result<Vec<String>, StrategyError>;
}

/// Chat-completion service
///
/// This port defines how the application layer talks to the LLM.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Send one request and return the assistant's reply.
    ///
    /// The reply may carry tool-call requests instead of (or alongside) text.
    async fn complete(&self, request: ChatRequest) -> Result<Message, LlmServiceError>;

    /// Complete a conversation, resolving tool calls internally.
    ///
    /// Every assistant reply and every tool result is appended to `trace`.
    /// After `max_rounds` tool round-trips one last request is sent with no
    /// tools so the model has to answer in text. Returns the final assistant
    /// message, which has also been appended to the trace.
    async fn complete_with_auto_invoke(
        &self,
        trace: &mut ExecutionTrace,
        tools: &[CapabilityDescriptor],
        options: SamplingOptions,
        invoker: &dyn ToolInvoker,
        max_rounds: usize,
    ) -> Result<Message, StrategyError> {
        let mut rounds = 0;

        loop {
            let offered = if rounds < max_rounds {
                tools.to_vec()
            } else {
                debug!("Auto-invoke round limit reached, requesting final answer");
                Vec::new()
            };

            let request = ChatRequest::new(trace.messages().to_vec())
                .with_tools(offered)
                .with_options(options);
            let reply = self.complete(request).await?;

            if !reply.has_tool_calls() {
                trace.push_assistant(reply.clone())?;
                return Ok(reply);
            }

            if rounds >= max_rounds {
                warn!(
                    "Model requested tools after {} auto-invoke rounds",
                    max_rounds
                );
                return Err(StrategyError::PlannerExhausted(max_rounds));
            }

            debug!(
                "Auto-invoke round {}: {} tool call(s)",
                rounds + 1,
                reply.tool_calls.len()
            );
            trace.push_assistant(reply.clone())?;
            invoker.invoke_all(trace, &reply.tool_calls).await?;
            rounds += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockChat, tool_call_reply};
    use orchestra_domain::Role;

    /// Answers every request with a fixed output.
    struct EchoInvoker;

    #[async_trait]
    impl ToolInvoker for EchoInvoker {
        async fn invoke_all(
            &self,
            trace: &mut ExecutionTrace,
            calls: &[ToolCallRequest],
        ) -> Result<Vec<String>, StrategyError> {
            let mut outputs = Vec::new();
            for call in calls {
                trace.record_tool_result(&call.id, "ok")?;
                outputs.push("ok".to_string());
            }
            Ok(outputs)
        }
    }

    #[tokio::test]
    async fn test_auto_invoke_resolves_tool_calls() {
        let chat = MockChat::new(vec![
            tool_call_reply("call_1", "get_current_utc_time"),
            Message::assistant("It is noon."),
        ]);
        let mut trace = ExecutionTrace::new();
        trace.push_user("What time is it?");

        let reply = chat
            .complete_with_auto_invoke(&mut trace, &[], SamplingOptions::default(), &EchoInvoker, 5)
            .await
            .unwrap();

        assert_eq!(reply.text(), "It is noon.");
        let roles: Vec<Role> = trace.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::User, Role::Assistant, Role::Tool, Role::Assistant]
        );
        assert_eq!(chat.request_count(), 2);
    }

    #[tokio::test]
    async fn test_auto_invoke_drops_tools_after_round_limit() {
        let chat = MockChat::new(vec![
            tool_call_reply("call_1", "get_current_utc_time"),
            Message::assistant("Done."),
        ]);
        let tools = vec![CapabilityDescriptor::new("get_current_utc_time", "time")];
        let mut trace = ExecutionTrace::new();
        trace.push_user("goal");

        chat.complete_with_auto_invoke(&mut trace, &tools, SamplingOptions::default(), &EchoInvoker, 1)
            .await
            .unwrap();

        let requests = chat.requests();
        assert_eq!(requests[0].tools.len(), 1);
        assert!(requests[1].tools.is_empty());
    }

    #[tokio::test]
    async fn test_auto_invoke_tool_call_without_tools_is_exhaustion() {
        let chat = MockChat::new(vec![tool_call_reply("call_1", "get_current_utc_time")]);
        let mut trace = ExecutionTrace::new();
        trace.push_user("goal");

        let err = chat
            .complete_with_auto_invoke(&mut trace, &[], SamplingOptions::default(), &EchoInvoker, 0)
            .await
            .unwrap_err();

        assert!(matches!(err, StrategyError::PlannerExhausted(0)));
        assert_eq!(trace.len(), 1);
    }

    #[test]
    fn test_sampling_options_serialization_skips_unset() {
        let json = serde_json::to_value(SamplingOptions {
            max_tokens: Some(50),
            ..SamplingOptions::default()
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"max_tokens": 50}));
    }
}

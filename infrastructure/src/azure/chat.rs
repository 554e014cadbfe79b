//! Azure OpenAI chat completions adapter
//!
//! Translates [`ChatRequest`]s to the Chat Completions wire format and
//! back. Request building and response parsing are plain functions so they
//! can be tested without a server.

use super::AzureOpenAiClient;
use crate::tools::JsonSchemaToolConverter;
use async_trait::async_trait;
use orchestra_application::{ChatRequest, ChatService, LlmServiceError, ToolSchemaPort};
use orchestra_domain::{Message, Role, ToolCallRequest};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tracing::{debug, info};

/// Chat service backed by an Azure OpenAI chat deployment.
pub struct AzureOpenAiChatService {
    client: AzureOpenAiClient,
    deployment: String,
    model: String,
    tool_schema: Arc<dyn ToolSchemaPort>,
}

impl AzureOpenAiChatService {
    pub fn new(
        client: AzureOpenAiClient,
        deployment: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            deployment: deployment.into(),
            model: model.into(),
            tool_schema: Arc::new(JsonSchemaToolConverter),
        }
    }
}

/// Build the JSON body for a chat completions request.
pub fn build_body(request: &ChatRequest, tool_schema: &dyn ToolSchemaPort) -> Value {
    let mut body = Map::new();
    body.insert(
        "messages".to_string(),
        Value::Array(request.messages.iter().map(message_to_wire).collect()),
    );

    if !request.tools.is_empty() {
        body.insert(
            "tools".to_string(),
            Value::Array(tool_schema.tools_schema(&request.tools)),
        );
        body.insert("tool_choice".to_string(), json!("auto"));
    }

    let options = &request.options;
    if let Some(max_tokens) = options.max_tokens {
        body.insert("max_tokens".to_string(), json!(max_tokens));
    }
    if let Some(temperature) = options.temperature {
        body.insert("temperature".to_string(), json!(temperature));
    }
    if let Some(top_p) = options.top_p {
        body.insert("top_p".to_string(), json!(top_p));
    }

    Value::Object(body)
}

fn message_to_wire(message: &Message) -> Value {
    match message.role {
        Role::Tool => json!({
            "role": "tool",
            "tool_call_id": message.tool_call_id.as_deref().unwrap_or_default(),
            "content": message.text(),
        }),
        Role::Assistant if message.has_tool_calls() => json!({
            "role": "assistant",
            "content": message.content,
            "tool_calls": message.tool_calls.iter().map(tool_call_to_wire).collect::<Vec<_>>(),
        }),
        role => json!({
            "role": role.as_str(),
            "content": message.text(),
        }),
    }
}

fn tool_call_to_wire(call: &ToolCallRequest) -> Value {
    // The API carries arguments as a JSON-encoded string.
    let arguments = match &call.arguments {
        Value::Null => "{}".to_string(),
        other => other.to_string(),
    };
    json!({
        "id": call.id,
        "type": "function",
        "function": {
            "name": call.capability,
            "arguments": arguments,
        }
    })
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<WireToolCall>,
}

#[derive(Debug, Deserialize)]
struct WireToolCall {
    id: String,
    function: WireFunction,
}

#[derive(Debug, Deserialize)]
struct WireFunction {
    name: String,
    #[serde(default)]
    arguments: String,
}

/// Parse a successful chat completions response into an assistant message.
pub fn parse_response(text: &str) -> Result<Message, LlmServiceError> {
    let parsed: WireResponse = serde_json::from_str(text)
        .map_err(|e| LlmServiceError::InvalidResponse(format!("{e}: {text}")))?;

    let message = parsed
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or_else(|| LlmServiceError::InvalidResponse("response has no choices".to_string()))?;

    let content = message.content.filter(|c| !c.trim().is_empty());
    if message.tool_calls.is_empty() {
        return content
            .map(Message::assistant)
            .ok_or(LlmServiceError::EmptyResponse);
    }

    let calls = message
        .tool_calls
        .into_iter()
        .map(|call| {
            ToolCallRequest::new(call.id, call.function.name, parse_arguments(&call.function.arguments))
        })
        .collect();
    Ok(Message::assistant_tool_calls(content, calls))
}

/// Arguments arrive as a string; models occasionally send malformed JSON,
/// which is kept as a string so argument binding reports it.
fn parse_arguments(raw: &str) -> Value {
    if raw.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn status_error(code: u16, body: String) -> LlmServiceError {
    match code {
        401 | 403 => LlmServiceError::Auth(body),
        _ => LlmServiceError::Status { code, body },
    }
}

#[async_trait]
impl ChatService for AzureOpenAiChatService {
    async fn complete(&self, request: ChatRequest) -> Result<Message, LlmServiceError> {
        let url = self.client.deployment_url(&self.deployment, "chat/completions");
        let body = build_body(&request, self.tool_schema.as_ref());
        debug!(
            "Chat request to {} ({} messages, {} tools)",
            self.deployment,
            request.messages.len(),
            request.tools.len()
        );

        let (status, text) = self
            .client
            .post_json(&url, &body)
            .await
            .map_err(|e| LlmServiceError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(status_error(status.as_u16(), text));
        }

        let reply = parse_response(&text)?;
        info!(
            "Chat reply from {}: {} tool call(s)",
            self.model,
            reply.tool_calls.len()
        );
        Ok(reply)
    }
}

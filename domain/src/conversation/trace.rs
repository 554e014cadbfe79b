//! Execution trace
//!
//! The trace is the ordered conversation of a single strategy run. It is
//! append-only and enforces the tool-result invariant: every `tool` message
//! answers exactly one earlier assistant tool-call request, and each request
//! is answered at most once.

use crate::conversation::message::{Message, Role, ToolCallRequest};
use crate::core::error::DomainError;
use serde::Serialize;

/// Append-only log of role-tagged messages for one orchestration run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ExecutionTrace {
    messages: Vec<Message>,
}

impl ExecutionTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_system(&mut self, content: impl Into<String>) {
        self.messages.push(Message::system(content));
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    /// Append an assistant message, possibly carrying tool-call requests.
    ///
    /// Request ids must be non-empty and unique across the whole trace.
    pub fn push_assistant(&mut self, message: Message) -> Result<(), DomainError> {
        if message.role != Role::Assistant {
            return Err(DomainError::TraceViolation(format!(
                "expected an assistant message, got {}",
                message.role
            )));
        }

        for (index, call) in message.tool_calls.iter().enumerate() {
            if call.id.is_empty() {
                return Err(DomainError::TraceViolation(format!(
                    "tool call '{}' has an empty id",
                    call.capability
                )));
            }
            let repeated_in_message = message.tool_calls[..index]
                .iter()
                .any(|earlier| earlier.id == call.id);
            if repeated_in_message || self.find_request(&call.id).is_some() {
                return Err(DomainError::TraceViolation(format!(
                    "tool call id '{}' is already in use",
                    call.id
                )));
            }
        }

        self.messages.push(message);
        Ok(())
    }

    /// Append the result of a previously requested tool call.
    pub fn record_tool_result(
        &mut self,
        tool_call_id: &str,
        content: impl Into<String>,
    ) -> Result<(), DomainError> {
        let capability = self
            .find_request(tool_call_id)
            .map(|call| call.capability.clone())
            .ok_or_else(|| {
                DomainError::TraceViolation(format!(
                    "no tool call request with id '{tool_call_id}'"
                ))
            })?;

        if self.is_answered(tool_call_id) {
            return Err(DomainError::TraceViolation(format!(
                "tool call '{tool_call_id}' already has a result"
            )));
        }

        self.messages
            .push(Message::tool_result(tool_call_id, capability, content));
        Ok(())
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Find an assistant tool-call request by id.
    pub fn find_request(&self, tool_call_id: &str) -> Option<&ToolCallRequest> {
        self.messages
            .iter()
            .filter(|m| m.role == Role::Assistant)
            .flat_map(|m| m.tool_calls.iter())
            .find(|call| call.id == tool_call_id)
    }

    fn is_answered(&self, tool_call_id: &str) -> bool {
        self.tool_results()
            .any(|m| m.tool_call_id.as_deref() == Some(tool_call_id))
    }

    /// Tool-call requests that have no result yet, in request order.
    pub fn pending_tool_calls(&self) -> Vec<&ToolCallRequest> {
        self.messages
            .iter()
            .filter(|m| m.role == Role::Assistant)
            .flat_map(|m| m.tool_calls.iter())
            .filter(|call| !self.is_answered(&call.id))
            .collect()
    }

    pub fn tool_results(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| m.role == Role::Tool)
    }

    /// Number of tool results recorded so far.
    pub fn tool_call_count(&self) -> usize {
        self.tool_results().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn request(id: &str) -> ToolCallRequest {
        ToolCallRequest::new(id, "get_current_utc_time", Value::Null)
    }

    #[test]
    fn test_tool_result_links_to_request() {
        let mut trace = ExecutionTrace::new();
        trace.push_user("What time is it in UTC?");
        trace
            .push_assistant(Message::assistant_tool_calls(None, vec![request("call_1")]))
            .unwrap();
        assert_eq!(trace.pending_tool_calls().len(), 1);

        trace
            .record_tool_result("call_1", "Wed, 01 Jan 2025 00:00:00 GMT")
            .unwrap();
        trace.push_assistant(Message::assistant("It is midnight.")).unwrap();

        assert_eq!(trace.len(), 4);
        assert_eq!(trace.tool_call_count(), 1);
        assert!(trace.pending_tool_calls().is_empty());
        let tool = &trace.messages()[2];
        assert_eq!(tool.role, Role::Tool);
        assert_eq!(tool.name.as_deref(), Some("get_current_utc_time"));
    }

    #[test]
    fn test_orphan_tool_result_rejected() {
        let mut trace = ExecutionTrace::new();
        trace.push_user("goal");
        let err = trace.record_tool_result("call_404", "out").unwrap_err();
        assert!(matches!(err, DomainError::TraceViolation(_)));
        assert_eq!(trace.len(), 1);
    }

    #[test]
    fn test_tool_result_recorded_only_once() {
        let mut trace = ExecutionTrace::new();
        trace
            .push_assistant(Message::assistant_tool_calls(None, vec![request("call_1")]))
            .unwrap();
        trace.record_tool_result("call_1", "first").unwrap();
        assert!(trace.record_tool_result("call_1", "second").is_err());
        assert_eq!(trace.tool_call_count(), 1);
    }

    #[test]
    fn test_duplicate_request_ids_rejected() {
        let mut trace = ExecutionTrace::new();
        trace
            .push_assistant(Message::assistant_tool_calls(None, vec![request("call_1")]))
            .unwrap();

        let again = Message::assistant_tool_calls(None, vec![request("call_1")]);
        assert!(trace.push_assistant(again).is_err());

        let twice = Message::assistant_tool_calls(None, vec![request("a"), request("a")]);
        assert!(trace.push_assistant(twice).is_err());

        let empty = Message::assistant_tool_calls(None, vec![request("")]);
        assert!(trace.push_assistant(empty).is_err());
    }

    #[test]
    fn test_push_assistant_rejects_other_roles() {
        let mut trace = ExecutionTrace::new();
        assert!(trace.push_assistant(Message::user("hi")).is_err());
        assert!(trace.is_empty());
    }

    #[test]
    fn test_serializes_as_message_array() {
        let mut trace = ExecutionTrace::new();
        trace.push_system("sys");
        trace.push_user("goal");
        let value = serde_json::to_value(&trace).unwrap();
        assert_eq!(
            value,
            json!([
                {"role": "system", "content": "sys"},
                {"role": "user", "content": "goal"}
            ])
        );
    }
}

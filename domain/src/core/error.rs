//! Domain error types

use thiserror::Error;

/// Domain-level errors raised by the capability model and the execution trace.
///
/// All of these are programmer errors from the orchestrator's point of view:
/// they are fatal for the run in which they occur and never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Capability already registered: {0}")]
    DuplicateCapability(String),

    #[error("Unknown capability: {0}")]
    UnknownCapability(String),

    #[error("Invalid capability '{name}': {reason}")]
    InvalidCapability { name: String, reason: String },

    #[error("Argument binding failed for '{capability}': {reason}")]
    ArgumentBinding { capability: String, reason: String },

    #[error("Execution trace violation: {0}")]
    TraceViolation(String),
}

impl DomainError {
    pub(crate) fn binding(capability: &str, reason: impl Into<String>) -> Self {
        DomainError::ArgumentBinding {
            capability: capability.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors produced while compiling an LLM-authored plan.
///
/// `at` names the offending location, either `"step N"` (1-based) or
/// `"result"` for the terminal template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanParseError {
    #[error("No plan found in model response")]
    NotFound,

    #[error("Plan is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Plan has no steps")]
    Empty,

    #[error("{at} is missing required field '{field}'")]
    MissingField { at: String, field: &'static str },

    #[error("{at} references slot '{slot}' before it is produced")]
    DanglingReference { at: String, slot: String },

    #[error("{at} produces slot '{slot}' which is already defined")]
    DuplicateSlot { at: String, slot: String },

    #[error("{at} uses unknown capability '{capability}'")]
    UnknownCapability { at: String, capability: String },

    #[error("{at} has a malformed template: {reason}")]
    MalformedTemplate { at: String, reason: String },
}

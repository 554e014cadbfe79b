//! Domain layer for orchestra
//!
//! This crate contains the pure model of tool orchestration: capability
//! descriptors and argument binding, conversation messages and the
//! append-only execution trace, and the templated plan model used by the
//! plan compiler. It performs no I/O.
//!
//! # Core Concepts
//!
//! ## Capability
//!
//! A named, described function the LLM may call. Its
//! [`CapabilityDescriptor`] is the single source for the LLM-facing tool
//! schema and for argument binding.
//!
//! ## Execution Trace
//!
//! The ordered conversation of one strategy run. The trace refuses tool
//! results that do not answer an earlier assistant tool-call request.
//!
//! ## Plan
//!
//! A compiled, acyclic sequence of capability invocations whose arguments may
//! reference the outputs of earlier steps through `{{slot}}` templates.

pub mod capability;
pub mod config;
pub mod conversation;
pub mod core;
pub mod orchestration;
pub mod plan;

// Re-export commonly used types
pub use capability::{
    binding::BoundArguments,
    descriptor::{CapabilityDescriptor, ParamType, ParameterSpec},
};
pub use config::OutputFormat;
pub use conversation::{
    message::{Message, Role, ToolCallRequest},
    trace::ExecutionTrace,
};
pub use core::error::{DomainError, PlanParseError};
pub use orchestration::{run::RunResult, strategy::StrategyKind};
pub use plan::{
    entities::{Binding, Plan, PlanStep},
    parser::{parse_plan, parse_plan_json},
    template::Template,
};

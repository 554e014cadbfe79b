//! Capability domain module
//!
//! A capability is a named function the LLM may invoke as a tool. This module
//! holds the pure half of the model: what a capability looks like and how raw
//! LLM arguments are bound to its parameters. Invocation itself is async and
//! lives behind the `Capability` port in the application layer.
//!
//! ```text
//! ┌────────────────────────┐    bind()    ┌────────────────┐
//! │ CapabilityDescriptor   │─────────────▶│ BoundArguments │──▶ invoke()
//! │ name / description     │  JSON object │ ordered by     │
//! │ parameters[]           │  or array    │ parameter list │
//! └────────────────────────┘              └────────────────┘
//! ```
//!
//! Descriptors are declared explicitly in code; the JSON schema sent to the
//! LLM is derived from them by the infrastructure layer.

pub mod binding;
pub mod descriptor;

pub use binding::BoundArguments;
pub use descriptor::{CapabilityDescriptor, ParamType, ParameterSpec};

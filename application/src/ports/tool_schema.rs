//! Tool schema conversion port.
//!
//! Separates "which capabilities are offered" (domain descriptors) from "how
//! they are serialized for the chat API" (infrastructure).

use orchestra_domain::CapabilityDescriptor;

/// Port for converting capability descriptors to the chat API's tool format.
pub trait ToolSchemaPort: Send + Sync {
    /// Convert a single descriptor to a tool declaration.
    fn tool_to_schema(&self, tool: &CapabilityDescriptor) -> serde_json::Value;

    /// Convert descriptors in the order given.
    fn tools_schema(&self, tools: &[CapabilityDescriptor]) -> Vec<serde_json::Value> {
        tools.iter().map(|t| self.tool_to_schema(t)).collect()
    }
}

//! JSON Schema tool converter.
//!
//! Default implementation of [`ToolSchemaPort`] that produces the
//! `{"type": "function", "function": {...}}` declarations expected by the
//! Chat Completions API.

use orchestra_application::ToolSchemaPort;
use orchestra_domain::CapabilityDescriptor;

/// Default implementation producing function-tool JSON Schema.
///
/// Parameter types map one-to-one onto JSON Schema types. Parameters keep
/// their declaration order and tools keep registration order.
pub struct JsonSchemaToolConverter;

impl ToolSchemaPort for JsonSchemaToolConverter {
    fn tool_to_schema(&self, tool: &CapabilityDescriptor) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in &tool.parameters {
            let mut prop = serde_json::Map::new();
            prop.insert(
                "type".to_string(),
                serde_json::json!(param.param_type.as_str()),
            );
            if let Some(description) = &param.description {
                prop.insert("description".to_string(), serde_json::json!(description));
            }
            properties.insert(param.name.clone(), serde_json::Value::Object(prop));

            if param.required {
                required.push(serde_json::json!(param.name));
            }
        }

        serde_json::json!({
            "type": "function",
            "function": {
                "name": tool.name,
                "description": tool.description,
                "parameters": {
                    "type": "object",
                    "properties": properties,
                    "required": required,
                }
            }
        })
    }
}

//! Argument binding
//!
//! LLMs send tool arguments either as a JSON object keyed by parameter name
//! or, less often, as a positional JSON array. Both are bound against the
//! descriptor's parameter list: required parameters must be present, every
//! value must match its declared type, and names the descriptor does not
//! declare are rejected.

use crate::capability::descriptor::CapabilityDescriptor;
use crate::core::error::DomainError;
use serde_json::Value;

/// Arguments bound to a capability's parameter list, in declaration order.
///
/// Optional parameters that were not supplied (or supplied as `null`) are
/// absent.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundArguments {
    capability: String,
    values: Vec<(String, Value)>,
}

impl BoundArguments {
    /// Empty argument set, for parameterless capabilities.
    pub fn empty(capability: impl Into<String>) -> Self {
        Self {
            capability: capability.into(),
            values: Vec::new(),
        }
    }

    pub fn capability(&self) -> &str {
        &self.capability
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.as_str())
    }

    /// Get a string argument that the descriptor declares as required.
    pub fn require_str(&self, name: &str) -> Result<&str, DomainError> {
        self.get_str(name).ok_or_else(|| {
            DomainError::binding(&self.capability, format!("missing string argument '{name}'"))
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub(crate) fn bind_arguments(
    descriptor: &CapabilityDescriptor,
    raw: &Value,
) -> Result<BoundArguments, DomainError> {
    let name = descriptor.name.as_str();

    let provided: Vec<(&str, &Value)> = match raw {
        Value::Null => Vec::new(),
        Value::Object(map) => {
            for key in map.keys() {
                if descriptor.parameter(key).is_none() {
                    return Err(DomainError::binding(
                        name,
                        format!("unknown parameter '{key}'"),
                    ));
                }
            }
            map.iter().map(|(k, v)| (k.as_str(), v)).collect()
        }
        Value::Array(items) => {
            if items.len() > descriptor.parameters.len() {
                return Err(DomainError::binding(
                    name,
                    format!(
                        "expected at most {} positional arguments, got {}",
                        descriptor.parameters.len(),
                        items.len()
                    ),
                ));
            }
            descriptor
                .parameters
                .iter()
                .zip(items)
                .map(|(param, value)| (param.name.as_str(), value))
                .collect()
        }
        other => {
            return Err(DomainError::binding(
                name,
                format!("expected a JSON object or array, got {}", json_type_name(other)),
            ));
        }
    };

    let mut values = Vec::with_capacity(descriptor.parameters.len());
    for param in &descriptor.parameters {
        let supplied = provided
            .iter()
            .find(|(key, _)| *key == param.name)
            .map(|(_, value)| *value)
            .filter(|value| !value.is_null());

        match supplied {
            Some(value) if param.param_type.accepts(value) => {
                values.push((param.name.clone(), value.clone()));
            }
            Some(value) => {
                return Err(DomainError::binding(
                    name,
                    format!(
                        "parameter '{}' expects {}, got {}",
                        param.name,
                        param.param_type,
                        json_type_name(value)
                    ),
                ));
            }
            None if param.required => {
                return Err(DomainError::binding(
                    name,
                    format!("missing required parameter '{}'", param.name),
                ));
            }
            None => {}
        }
    }

    Ok(BoundArguments {
        capability: name.to_string(),
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::descriptor::{ParamType, ParameterSpec};
    use serde_json::json;

    fn image() -> CapabilityDescriptor {
        CapabilityDescriptor::new("create_image_from_text", "Creates an image")
            .with_parameter(ParameterSpec::new("description", ParamType::String))
            .with_parameter(ParameterSpec::new("size", ParamType::Integer).optional())
    }

    #[test]
    fn test_bind_by_name() {
        let bound = image()
            .bind(&json!({"description": "a sunny plaza", "size": 512}))
            .unwrap();
        assert_eq!(bound.require_str("description").unwrap(), "a sunny plaza");
        assert_eq!(bound.get("size"), Some(&json!(512)));
        assert_eq!(bound.capability(), "create_image_from_text");
    }

    #[test]
    fn test_bind_positionally_keeps_declaration_order() {
        let bound = image().bind(&json!(["a sunny plaza", 256])).unwrap();
        let names: Vec<&str> = bound.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["description", "size"]);
    }

    #[test]
    fn test_optional_parameter_may_be_absent_or_null() {
        let bound = image()
            .bind(&json!({"description": "rain", "size": null}))
            .unwrap();
        assert_eq!(bound.len(), 1);
        assert!(bound.get("size").is_none());
    }

    #[test]
    fn test_missing_required_parameter() {
        let err = image().bind(&json!({})).unwrap_err();
        assert!(err.to_string().contains("missing required parameter 'description'"));
    }

    #[test]
    fn test_type_mismatch() {
        let err = image().bind(&json!({"description": 42})).unwrap_err();
        assert!(matches!(err, DomainError::ArgumentBinding { .. }));
        assert!(err.to_string().contains("expects string, got integer"));
    }

    #[test]
    fn test_unknown_parameter_rejected() {
        let err = image()
            .bind(&json!({"description": "x", "style": "oil"}))
            .unwrap_err();
        assert!(err.to_string().contains("unknown parameter 'style'"));
    }

    #[test]
    fn test_too_many_positional_arguments() {
        let err = image().bind(&json!(["x", 1, true])).unwrap_err();
        assert!(err.to_string().contains("at most 2 positional arguments"));
    }

    #[test]
    fn test_scalar_payload_rejected() {
        let err = image().bind(&json!("a sunny plaza")).unwrap_err();
        assert!(err.to_string().contains("expected a JSON object or array"));
    }

    #[test]
    fn test_null_payload_binds_parameterless_capability() {
        let descriptor = CapabilityDescriptor::new("get_current_utc_time", "Current UTC time");
        let bound = descriptor.bind(&Value::Null).unwrap();
        assert!(bound.is_empty());
        assert_eq!(bound, BoundArguments::empty("get_current_utc_time"));
    }
}

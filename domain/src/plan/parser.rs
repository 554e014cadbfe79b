//! Plan parsing from LLM responses.
//!
//! Accepts ` ```plan ` or ` ```json ` fenced blocks, raw JSON, or a JSON
//! object embedded in surrounding prose. Parsing doubles as compilation: the
//! returned [`Plan`] is guaranteed to reference only slots produced by
//! strictly earlier steps and to define every slot once.

use crate::core::error::PlanParseError;
use crate::plan::entities::{Binding, Plan, PlanStep};
use crate::plan::template::Template;
use serde_json::Value;
use std::collections::HashSet;

/// Parse and compile a plan from model response text.
pub fn parse_plan(response: &str) -> Result<Plan, PlanParseError> {
    let json = extract_json(response)?;
    parse_plan_json(&json)
}

fn extract_json(response: &str) -> Result<Value, PlanParseError> {
    // Look for ```plan / ```json ... ``` blocks
    let mut in_block = false;
    let mut current_block = String::new();

    for line in response.lines() {
        let trimmed = line.trim();
        if !in_block && (trimmed == "```plan" || trimmed == "```json") {
            in_block = true;
            current_block.clear();
        } else if in_block && trimmed == "```" {
            return serde_json::from_str(&current_block)
                .map_err(|e| PlanParseError::InvalidJson(e.to_string()));
        } else if in_block {
            current_block.push_str(line);
            current_block.push('\n');
        }
    }

    if let Ok(parsed) = serde_json::from_str::<Value>(response.trim()) {
        return Ok(parsed);
    }

    // Fall back to the outermost braces in surrounding prose
    match (response.find('{'), response.rfind('}')) {
        (Some(start), Some(end)) if start < end => serde_json::from_str(&response[start..=end])
            .map_err(|e| PlanParseError::InvalidJson(e.to_string())),
        _ => Err(PlanParseError::NotFound),
    }
}

/// JSON value to a non-empty string (numbers are stringified).
fn json_value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn first_field<'a>(json: &'a Value, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|name| json.get(*name))
}

fn parse_template(source: &str, at: &str) -> Result<Template, PlanParseError> {
    Template::parse(source).map_err(|reason| PlanParseError::MalformedTemplate {
        at: at.to_string(),
        reason,
    })
}

fn parse_binding(value: &Value, at: &str) -> Result<Binding, PlanParseError> {
    match value {
        Value::String(s) if s.contains("{{") => {
            Ok(Binding::Template(parse_template(s, at)?))
        }
        Value::Object(map) if map.len() == 1 && map.contains_key("$ref") => {
            let slot = map
                .get("$ref")
                .and_then(json_value_to_string)
                .ok_or_else(|| PlanParseError::MalformedTemplate {
                    at: at.to_string(),
                    reason: "\"$ref\" must name a slot".to_string(),
                })?;
            Ok(Binding::Template(parse_template(&format!("{{{{{slot}}}}}"), at)?))
        }
        other => Ok(Binding::Literal(other.clone())),
    }
}

/// Parse and compile a plan from a JSON value.
///
/// Expected schema:
/// ```json
/// {
///   "steps": [
///     {
///       "capability": "string (alias: tool, function)",
///       "arguments": { "name": "literal or {{slot}} template" },
///       "output": "slot name (alias: id; default: step_N)",
///       "description": "string (optional)"
///     }
///   ],
///   "result": "{{slot}} template (optional)"
/// }
/// ```
pub fn parse_plan_json(json: &Value) -> Result<Plan, PlanParseError> {
    let steps_json = json
        .get("steps")
        .and_then(|v| v.as_array())
        .ok_or(PlanParseError::MissingField {
            at: "plan".to_string(),
            field: "steps",
        })?;

    if steps_json.is_empty() {
        return Err(PlanParseError::Empty);
    }

    let mut steps = Vec::with_capacity(steps_json.len());
    let mut produced: HashSet<String> = HashSet::new();

    for (index, step_json) in steps_json.iter().enumerate() {
        let at = format!("step {}", index + 1);

        let capability = first_field(step_json, &["capability", "tool", "function"])
            .and_then(json_value_to_string)
            .ok_or_else(|| PlanParseError::MissingField {
                at: at.clone(),
                field: "capability",
            })?;

        let output = first_field(step_json, &["output", "id"])
            .and_then(json_value_to_string)
            .unwrap_or_else(|| format!("step_{}", index + 1));

        let mut step = PlanStep::new(capability, output);

        if let Some(description) = step_json.get("description").and_then(json_value_to_string) {
            step = step.with_description(description);
        }

        match first_field(step_json, &["arguments", "args"]) {
            None | Some(Value::Null) => {}
            Some(Value::Object(args)) => {
                for (name, value) in args {
                    step = step.with_argument(name, parse_binding(value, &at)?);
                }
            }
            Some(_) => {
                return Err(PlanParseError::MissingField {
                    at,
                    field: "arguments",
                });
            }
        }

        // References must point strictly backwards; a step naming its own
        // output is a cycle and fails here too.
        if let Some(slot) = step.references().find(|slot| !produced.contains(*slot)) {
            return Err(PlanParseError::DanglingReference {
                at,
                slot: slot.to_string(),
            });
        }

        if !produced.insert(step.output.clone()) {
            return Err(PlanParseError::DuplicateSlot {
                at,
                slot: step.output,
            });
        }

        steps.push(step);
    }

    let result = match json.get("result") {
        None | Some(Value::Null) => None,
        Some(Value::String(source)) => {
            let template = parse_template(source, "result")?;
            if let Some(slot) = template.slots().find(|slot| !produced.contains(*slot)) {
                return Err(PlanParseError::DanglingReference {
                    at: "result".to_string(),
                    slot: slot.to_string(),
                });
            }
            Some(template)
        }
        Some(_) => {
            return Err(PlanParseError::MalformedTemplate {
                at: "result".to_string(),
                reason: "expected a string".to_string(),
            });
        }
    };

    Ok(Plan { steps, result })
}

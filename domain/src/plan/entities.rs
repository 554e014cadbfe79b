//! Plan entities

use crate::core::error::PlanParseError;
use crate::plan::template::Template;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// How a step argument obtains its value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Binding {
    /// A JSON value passed through unchanged
    Literal(Value),
    /// A string rendered from earlier step outputs
    Template(Template),
}

impl Binding {
    /// Slots this binding depends on.
    pub fn references(&self) -> Vec<&str> {
        match self {
            Binding::Literal(_) => Vec::new(),
            Binding::Template(template) => template.slots().collect(),
        }
    }

    /// Resolve against produced slot values. Returns `None` if a referenced
    /// slot has not been produced.
    pub fn resolve(&self, values: &HashMap<String, String>) -> Option<Value> {
        match self {
            Binding::Literal(value) => Some(value.clone()),
            Binding::Template(template) => template.render(values).map(Value::String),
        }
    }
}

impl std::fmt::Display for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Binding::Literal(value) => write!(f, "{value}"),
            Binding::Template(template) => write!(f, "\"{template}\""),
        }
    }
}

/// One capability invocation in a plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanStep {
    /// Capability to invoke
    pub capability: String,
    /// Argument bindings, in the order the model wrote them
    pub arguments: Vec<(String, Binding)>,
    /// Output slot receiving the capability's result
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PlanStep {
    pub fn new(capability: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            capability: capability.into(),
            arguments: Vec::new(),
            output: output.into(),
            description: None,
        }
    }

    pub fn with_argument(mut self, name: impl Into<String>, binding: Binding) -> Self {
        self.arguments.push((name.into(), binding));
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.arguments.iter().flat_map(|(_, b)| b.references())
    }
}

/// A compiled, acyclic sequence of steps.
///
/// Built by the parser, which guarantees every reference points at a slot
/// produced by a strictly earlier step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    pub steps: Vec<PlanStep>,
    /// Terminal template; defaults to the last step's output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Template>,
}

impl Plan {
    /// Slot that holds the final answer when no result template is set.
    pub fn terminal_slot(&self) -> Option<&str> {
        self.steps.last().map(|s| s.output.as_str())
    }

    pub fn capabilities(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|s| s.capability.as_str())
    }

    /// Reject plans naming a capability for which `known` returns false.
    pub fn check_capabilities(
        &self,
        known: impl Fn(&str) -> bool,
    ) -> Result<(), PlanParseError> {
        match self
            .steps
            .iter()
            .enumerate()
            .find(|(_, step)| !known(&step.capability))
        {
            Some((index, step)) => Err(PlanParseError::UnknownCapability {
                at: format!("step {}", index + 1),
                capability: step.capability.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Render the final answer from produced slot values.
    pub fn render_result(&self, values: &HashMap<String, String>) -> Option<String> {
        match &self.result {
            Some(template) => template.render(values),
            None => self
                .terminal_slot()
                .and_then(|slot| values.get(slot).cloned()),
        }
    }
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, step) in self.steps.iter().enumerate() {
            let args = step
                .arguments
                .iter()
                .map(|(name, binding)| format!("{name}: {binding}"))
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, "{}. {} = {}({})", index + 1, step.output, step.capability, args)?;
            if let Some(description) = &step.description {
                write!(f, "  # {description}")?;
            }
            writeln!(f)?;
        }
        match &self.result {
            Some(template) => write!(f, "=> \"{template}\""),
            None => write!(f, "=> {{{{{}}}}}", self.terminal_slot().unwrap_or("")),
        }
    }
}

//! `{{slot}}` string templates used by plan bindings.

use serde::Serialize;
use std::collections::HashMap;

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum Segment {
    Text(String),
    Slot(String),
}

/// A string with `{{slot}}` placeholders.
///
/// Slot names may contain ASCII letters, digits, `_`, `-` and `.`; whitespace
/// inside the braces is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Template {
    segments: Vec<Segment>,
}

fn valid_slot_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

impl Template {
    /// Parse a template, returning a reason string on malformed placeholders.
    pub fn parse(source: &str) -> Result<Self, String> {
        let mut segments = Vec::new();
        let mut rest = source;

        while let Some(open) = rest.find("{{") {
            if open > 0 {
                segments.push(Segment::Text(rest[..open].to_string()));
            }
            let after_open = &rest[open + 2..];
            let close = after_open
                .find("}}")
                .ok_or_else(|| format!("unclosed placeholder in \"{source}\""))?;
            let name = after_open[..close].trim();
            if !valid_slot_name(name) {
                return Err(format!("invalid slot name \"{name}\""));
            }
            segments.push(Segment::Slot(name.to_string()));
            rest = &after_open[close + 2..];
        }

        if !rest.is_empty() {
            segments.push(Segment::Text(rest.to_string()));
        }

        Ok(Self { segments })
    }

    /// Template consisting of a single slot reference.
    pub fn slot(name: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment::Slot(name.into())],
        }
    }

    /// Slot names referenced by this template, in order of appearance.
    pub fn slots(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Slot(name) => Some(name.as_str()),
            Segment::Text(_) => None,
        })
    }

    /// Render against produced slot values. Returns `None` if a referenced
    /// slot has no value.
    pub fn render(&self, values: &HashMap<String, String>) -> Option<String> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Slot(name) => out.push_str(values.get(name)?),
            }
        }
        Some(out)
    }
}

impl std::fmt::Display for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => write!(f, "{text}")?,
                Segment::Slot(name) => write!(f, "{{{{{name}}}}}")?,
            }
        }
        Ok(())
    }
}

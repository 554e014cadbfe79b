//! Output format value object

use serde::{Deserialize, Serialize};

/// How a demonstration report is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Every trace, followed by each strategy's answer and timing (default)
    #[default]
    Full,
    /// Only the final answers
    Answer,
    /// The whole report as JSON
    Json,
}

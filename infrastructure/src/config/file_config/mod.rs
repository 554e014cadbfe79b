//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod azure;
mod http;
mod output;
mod planner;
mod weatherstack;

pub use azure::FileAzureOpenAiConfig;
pub use http::FileHttpConfig;
pub use output::FileOutputConfig;
pub use planner::FilePlannerConfig;
pub use weatherstack::FileWeatherstackConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    #[error("{field} is not a valid http(s) URL: {value}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{0} must be greater than 0")]
    ZeroValue(&'static str),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Azure OpenAI resource and deployments
    pub azure_openai: FileAzureOpenAiConfig,
    /// Weatherstack credentials
    pub weatherstack: FileWeatherstackConfig,
    /// Strategy loop settings
    pub planner: FilePlannerConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// HTTP client settings
    pub http: FileHttpConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// An empty result means the adapters can be built from this config.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();
        issues.extend(self.azure_openai.validate());
        issues.extend(self.weatherstack.validate());
        issues.extend(self.planner.validate());
        issues.extend(self.http.validate());
        issues
    }
}

/// Push an `EmptyField` issue for each blank value.
fn require_non_empty(
    issues: &mut Vec<ConfigValidationError>,
    fields: &[(&'static str, &str)],
) {
    for (field, value) in fields {
        if value.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyField(*field));
        }
    }
}

/// Push an `InvalidUrl` issue unless `value` is an absolute http(s) URL.
///
/// Blank values are left to [`require_non_empty`].
fn require_http_url(issues: &mut Vec<ConfigValidationError>, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        return;
    }
    let valid = reqwest::Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false);
    if !valid {
        issues.push(ConfigValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        });
    }
}

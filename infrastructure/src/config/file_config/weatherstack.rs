//! Weatherstack configuration from TOML (`[weatherstack]` section)

use super::{ConfigValidationError, require_http_url, require_non_empty};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api.weatherstack.com";

/// Raw Weatherstack configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileWeatherstackConfig {
    pub access_key: String,
    /// API root; `/current` is appended
    pub base_url: String,
}

impl Default for FileWeatherstackConfig {
    fn default() -> Self {
        Self {
            access_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl FileWeatherstackConfig {
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();
        require_non_empty(
            &mut issues,
            &[
                ("weatherstack.access_key", self.access_key.as_str()),
                ("weatherstack.base_url", self.base_url.as_str()),
            ],
        );
        require_http_url(&mut issues, "weatherstack.base_url", &self.base_url);
        issues
    }
}

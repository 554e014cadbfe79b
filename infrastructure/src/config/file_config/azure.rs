//! Azure OpenAI configuration from TOML (`[azure_openai]` section)

use super::{ConfigValidationError, require_http_url, require_non_empty};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_VERSION: &str = "2024-02-15-preview";

/// Raw Azure OpenAI configuration from TOML
///
/// Deployment names are chosen when the model is deployed and need not match
/// the model name (a `gpt-4o` model may be deployed as `my-chat`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAzureOpenAiConfig {
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com/`
    pub endpoint: String,
    /// API key sent in the `api-key` header
    pub key: String,
    pub api_version: String,
    pub chat_deployment: String,
    pub chat_model: String,
    pub image_deployment: String,
    pub image_model: String,
}

impl Default for FileAzureOpenAiConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            key: String::new(),
            api_version: DEFAULT_API_VERSION.to_string(),
            chat_deployment: String::new(),
            chat_model: String::new(),
            image_deployment: String::new(),
            image_model: String::new(),
        }
    }
}

impl FileAzureOpenAiConfig {
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();
        require_non_empty(
            &mut issues,
            &[
                ("azure_openai.endpoint", self.endpoint.as_str()),
                ("azure_openai.key", self.key.as_str()),
                ("azure_openai.api_version", self.api_version.as_str()),
                ("azure_openai.chat_deployment", self.chat_deployment.as_str()),
                ("azure_openai.chat_model", self.chat_model.as_str()),
                ("azure_openai.image_deployment", self.image_deployment.as_str()),
                ("azure_openai.image_model", self.image_model.as_str()),
            ],
        );
        require_http_url(&mut issues, "azure_openai.endpoint", &self.endpoint);
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::valid_config;
    use super::*;

    #[test]
    fn test_invalid_endpoint() {
        let mut config = valid_config().azure_openai;
        config.endpoint = "not a url".to_string();
        assert_eq!(
            config.validate(),
            vec![ConfigValidationError::InvalidUrl {
                field: "azure_openai.endpoint",
                value: "not a url".to_string(),
            }]
        );
    }

    #[test]
    fn test_blank_deployment() {
        let mut config = valid_config().azure_openai;
        config.image_deployment = "  ".to_string();
        assert_eq!(
            config.validate(),
            vec![ConfigValidationError::EmptyField("azure_openai.image_deployment")]
        );
    }
}

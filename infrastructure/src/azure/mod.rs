//! Azure OpenAI adapters
//!
//! Both services share one [`AzureOpenAiClient`], which knows the resource
//! endpoint, the credential and the API version. Each service adds the
//! deployment it talks to.

mod chat;
mod image;

pub use chat::AzureOpenAiChatService;
pub use image::AzureOpenAiImageGenerator;

use serde_json::Value;
use std::fmt;

/// Connection details for one Azure OpenAI resource.
#[derive(Clone)]
pub struct AzureOpenAiClient {
    http: reqwest::Client,
    endpoint: String,
    key: String,
    api_version: String,
}

impl AzureOpenAiClient {
    pub fn new(
        http: reqwest::Client,
        endpoint: impl Into<String>,
        key: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            key: key.into(),
            api_version: api_version.into(),
        }
    }

    /// URL of an operation on a deployment, e.g. `chat/completions`.
    pub fn deployment_url(&self, deployment: &str, operation: &str) -> String {
        format!(
            "{}/openai/deployments/{}/{}?api-version={}",
            self.endpoint, deployment, operation, self.api_version
        )
    }

    /// POST a JSON body and return the status with the raw response text.
    async fn post_json(
        &self,
        url: &str,
        body: &Value,
    ) -> Result<(reqwest::StatusCode, String), reqwest::Error> {
        let response = self
            .http
            .post(url)
            .header("api-key", &self.key)
            .json(body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        Ok((status, text))
    }
}

// The credential stays out of logs and panics.
impl fmt::Debug for AzureOpenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureOpenAiClient")
            .field("endpoint", &self.endpoint)
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deployment_url() {
        let client = AzureOpenAiClient::new(
            reqwest::Client::new(),
            "https://demo.openai.azure.com/",
            "secret",
            "2024-02-15-preview",
        );
        assert_eq!(
            client.deployment_url("gpt4o", "chat/completions"),
            "https://demo.openai.azure.com/openai/deployments/gpt4o/chat/completions?api-version=2024-02-15-preview"
        );
    }

    #[test]
    fn test_debug_hides_key() {
        let client = AzureOpenAiClient::new(
            reqwest::Client::new(),
            "https://demo.openai.azure.com",
            "secret",
            "2024-02-15-preview",
        );
        assert!(!format!("{client:?}").contains("secret"));
    }
}

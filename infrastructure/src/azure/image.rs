//! Azure OpenAI image generation adapter

use super::AzureOpenAiClient;
use async_trait::async_trait;
use orchestra_application::{ImageGenerationError, ImageGenerator};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info};

/// Image generator backed by an Azure OpenAI image deployment (DALL-E).
pub struct AzureOpenAiImageGenerator {
    client: AzureOpenAiClient,
    deployment: String,
    model: String,
}

impl AzureOpenAiImageGenerator {
    pub fn new(
        client: AzureOpenAiClient,
        deployment: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            deployment: deployment.into(),
            model: model.into(),
        }
    }
}

pub fn build_body(prompt: &str, width: u32, height: u32) -> Value {
    json!({
        "prompt": prompt,
        "n": 1,
        "size": format!("{width}x{height}"),
    })
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    data: Vec<WireImage>,
}

#[derive(Debug, Deserialize)]
struct WireImage {
    url: Option<String>,
}

/// Extract the URL of the first generated image.
pub fn parse_response(text: &str) -> Result<String, ImageGenerationError> {
    let parsed: WireResponse = serde_json::from_str(text)
        .map_err(|e| ImageGenerationError::InvalidResponse(format!("{e}: {text}")))?;
    parsed
        .data
        .into_iter()
        .next()
        .and_then(|image| image.url)
        .filter(|url| !url.is_empty())
        .ok_or_else(|| ImageGenerationError::InvalidResponse("response has no image URL".to_string()))
}

#[async_trait]
impl ImageGenerator for AzureOpenAiImageGenerator {
    async fn generate(
        &self,
        prompt: &str,
        width: u32,
        height: u32,
    ) -> Result<String, ImageGenerationError> {
        let url = self
            .client
            .deployment_url(&self.deployment, "images/generations");
        debug!("Image request to {} ({}x{})", self.deployment, width, height);

        let (status, text) = self
            .client
            .post_json(&url, &build_body(prompt, width, height))
            .await
            .map_err(|e| ImageGenerationError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(ImageGenerationError::Status {
                code: status.as_u16(),
                body: text,
            });
        }

        let image_url = parse_response(&text)?;
        info!("Image generated by {}", self.model);
        Ok(image_url)
    }
}

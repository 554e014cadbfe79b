//! Image generation port

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while generating an image
#[derive(Error, Debug)]
pub enum ImageGenerationError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Image service returned status {code}: {body}")]
    Status { code: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Text-to-image service
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate an image and return its URL.
    async fn generate(
        &self,
        prompt: &str,
        width: u32,
        height: u32,
    ) -> Result<String, ImageGenerationError>;
}

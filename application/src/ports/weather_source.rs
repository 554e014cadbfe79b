//! Weather source port

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while fetching current weather
#[derive(Error, Debug)]
pub enum WeatherServiceError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Weather service returned status {code}: {body}")]
    Status { code: u16, body: String },

    /// The service answered 2xx but reported a failure in the payload
    #[error("Weather API error {code}: {info}")]
    Api { code: i64, info: String },
}

/// Source of raw current-weather payloads
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Fetch the raw JSON payload describing current weather in `city`.
    async fn current(&self, city: &str) -> Result<String, WeatherServiceError>;
}

//! Capability port
//!
//! A capability is an LLM-invocable function. Its descriptor is declared
//! explicitly; arguments arrive already bound against that descriptor.

use crate::ports::chat_service::LlmServiceError;
use crate::ports::image_service::ImageGenerationError;
use crate::ports::weather_source::WeatherServiceError;
use async_trait::async_trait;
use orchestra_domain::{BoundArguments, CapabilityDescriptor, DomainError};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors raised by a capability invocation
#[derive(Error, Debug)]
pub enum CapabilityError {
    #[error(transparent)]
    Weather(#[from] WeatherServiceError),

    #[error(transparent)]
    Image(#[from] ImageGenerationError),

    #[error(transparent)]
    Llm(#[from] LlmServiceError),

    #[error(transparent)]
    Binding(#[from] DomainError),

    #[error("Operation cancelled")]
    Cancelled,
}

/// A named, described function with a string result.
#[async_trait]
pub trait Capability: Send + Sync {
    fn descriptor(&self) -> &CapabilityDescriptor;

    /// Invoke with bound arguments.
    ///
    /// Implementations must observe `cancellation` at every suspension point.
    async fn invoke(
        &self,
        args: &BoundArguments,
        cancellation: &CancellationToken,
    ) -> Result<String, CapabilityError>;

    fn name(&self) -> &str {
        &self.descriptor().name
    }
}

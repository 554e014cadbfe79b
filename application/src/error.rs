//! Strategy error type

use crate::ports::capability::CapabilityError;
use crate::ports::chat_service::LlmServiceError;
use crate::ports::image_service::ImageGenerationError;
use crate::ports::weather_source::WeatherServiceError;
use orchestra_domain::{DomainError, PlanParseError};
use thiserror::Error;

/// Errors that end a strategy run
///
/// Every variant is terminal for the strategy in which it occurs; the driver
/// reports it together with the partial trace.
#[derive(Error, Debug)]
pub enum StrategyError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Plan compilation failed: {0}")]
    PlanParse(#[from] PlanParseError),

    #[error("Weather service error: {0}")]
    WeatherService(WeatherServiceError),

    #[error("Image generation failed: {0}")]
    ImageGeneration(ImageGenerationError),

    #[error("LLM service error: {0}")]
    LlmService(#[from] LlmServiceError),

    #[error("Planner exhausted after {0} steps without a final answer")]
    PlannerExhausted(usize),

    #[error("Operation cancelled")]
    Cancelled,
}

impl StrategyError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, StrategyError::Cancelled)
    }

    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            StrategyError::Domain(DomainError::DuplicateCapability(_)) => "duplicate_capability",
            StrategyError::Domain(DomainError::UnknownCapability(_)) => "unknown_capability",
            StrategyError::Domain(DomainError::ArgumentBinding { .. }) => "argument_binding",
            StrategyError::Domain(_) => "domain",
            StrategyError::PlanParse(_) => "plan_parse",
            StrategyError::WeatherService(_) => "weather_service",
            StrategyError::ImageGeneration(_) => "image_generation",
            StrategyError::LlmService(_) => "llm_service",
            StrategyError::PlannerExhausted(_) => "planner_exhausted",
            StrategyError::Cancelled => "cancelled",
        }
    }
}

impl From<CapabilityError> for StrategyError {
    fn from(error: CapabilityError) -> Self {
        match error {
            CapabilityError::Weather(e) => StrategyError::WeatherService(e),
            CapabilityError::Image(e) => StrategyError::ImageGeneration(e),
            CapabilityError::Llm(e) => StrategyError::LlmService(e),
            CapabilityError::Binding(e) => StrategyError::Domain(e),
            CapabilityError::Cancelled => StrategyError::Cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_errors_keep_their_category() {
        let err: StrategyError = CapabilityError::Image(ImageGenerationError::Status {
            code: 500,
            body: "boom".to_string(),
        })
        .into();
        assert!(matches!(err, StrategyError::ImageGeneration(_)));
        assert_eq!(err.kind(), "image_generation");

        let err: StrategyError = CapabilityError::Cancelled.into();
        assert!(err.is_cancelled());
    }

    #[test]
    fn test_domain_error_kinds() {
        let err = StrategyError::from(DomainError::UnknownCapability("x".to_string()));
        assert_eq!(err.kind(), "unknown_capability");
        assert_eq!(err.to_string(), "Unknown capability: x");
    }
}

//! Application layer for orchestra
//!
//! This crate contains the ports that infrastructure adapters implement, the
//! capability registry and tool-call bridge, the shipped capabilities, the
//! three planning strategies and the driver that runs them in sequence.
//! It depends only on the domain layer.

pub mod capabilities;
pub mod config;
pub mod error;
pub mod ports;
pub mod registry;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use capabilities::{CreateImageFromText, GetCurrentUtcTime, GetWeatherForCity};
pub use config::{DEFAULT_GOAL, FailurePolicy, PlannerParams};
pub use error::StrategyError;
pub use ports::{
    capability::{Capability, CapabilityError},
    chat_service::{ChatRequest, ChatService, LlmServiceError, SamplingOptions, ToolInvoker},
    image_service::{ImageGenerationError, ImageGenerator},
    progress::{NoProgress, StrategyProgressNotifier},
    tool_schema::ToolSchemaPort,
    weather_source::{WeatherServiceError, WeatherSource},
};
pub use registry::CapabilityRegistry;
pub use use_cases::bridge::ToolCallBridge;
pub use use_cases::run_demonstration::{
    DemonstrationReport, RunDemonstrationUseCase, RunOutcome,
};
pub use use_cases::strategy::{PlanningStrategy, RunContext};
pub use use_cases::{
    auto_invoke::AutoInvokeStrategy, stepwise::StepwisePlanner,
    template_plan::TemplatePlanCompiler,
};

//! `get_weather_for_city`
//!
//! Fetches the raw current-weather payload and asks the model for a short,
//! readable summary of it.

use crate::ports::capability::{Capability, CapabilityError};
use crate::ports::chat_service::{ChatRequest, ChatService, LlmServiceError, SamplingOptions};
use crate::ports::weather_source::WeatherSource;
use crate::use_cases::shared::{cancellable, preview};
use async_trait::async_trait;
use orchestra_domain::{BoundArguments, CapabilityDescriptor, ParamType, ParameterSpec};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub const NAME: &str = "get_weather_for_city";

/// Sampling for the summary: short and nearly deterministic.
pub const SUMMARY_OPTIONS: SamplingOptions = SamplingOptions {
    max_tokens: Some(200),
    temperature: Some(0.1),
    top_p: Some(1.0),
};

pub struct GetWeatherForCity {
    descriptor: CapabilityDescriptor,
    source: Arc<dyn WeatherSource>,
    chat: Arc<dyn ChatService>,
}

impl GetWeatherForCity {
    pub fn new(source: Arc<dyn WeatherSource>, chat: Arc<dyn ChatService>) -> Self {
        Self {
            descriptor: CapabilityDescriptor::new(
                NAME,
                "Gets the current weather for the specified city",
            )
            .with_parameter(
                ParameterSpec::new("city_name", ParamType::String)
                    .with_description("Name of the city, e.g. Madrid"),
            ),
            source,
            chat,
        }
    }
}

fn summary_prompt(payload: &str) -> String {
    format!(
        "You are an expert at reading JSON responses from a weather service. \
         Write a short, easy to read summary of the weather described by the following JSON:\n\n\
         {payload}\n"
    )
}

#[async_trait]
impl Capability for GetWeatherForCity {
    fn descriptor(&self) -> &CapabilityDescriptor {
        &self.descriptor
    }

    async fn invoke(
        &self,
        args: &BoundArguments,
        cancellation: &CancellationToken,
    ) -> Result<String, CapabilityError> {
        let city = args.require_str("city_name")?;

        let payload = cancellable(cancellation, self.source.current(city))
            .await
            .ok_or(CapabilityError::Cancelled)??;
        debug!(city, "Weather payload: {}", preview(&payload, 200));

        let request = ChatRequest::prompt(summary_prompt(&payload)).with_options(SUMMARY_OPTIONS);
        let reply = cancellable(cancellation, self.chat.complete(request))
            .await
            .ok_or(CapabilityError::Cancelled)??;

        let summary = reply.text().trim();
        if summary.is_empty() {
            return Err(LlmServiceError::EmptyResponse.into());
        }
        Ok(summary.to_string())
    }
}

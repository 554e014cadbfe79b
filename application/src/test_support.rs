//! Test mocks shared by the use-case tests.

use crate::ports::capability::{Capability, CapabilityError};
use crate::ports::chat_service::{ChatRequest, ChatService, LlmServiceError};
use crate::ports::image_service::ImageGenerationError;
use crate::registry::CapabilityRegistry;
use async_trait::async_trait;
use orchestra_domain::{
    BoundArguments, CapabilityDescriptor, Message, ParamType, ParameterSpec, ToolCallRequest,
};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub(crate) const FIXED_TIME: &str = "Wed, 01 Jan 2025 00:00:00 GMT";
pub(crate) const WEATHER_SUMMARY: &str = "It's 20 degrees in Madrid.";
pub(crate) const IMAGE_RESULT: &str = "Your image is ready! \n\n URL: https://images.test/madrid.png";

// ==================== Chat ====================

/// Chat service answering from a queue of canned replies.
pub(crate) struct MockChat {
    responses: Mutex<VecDeque<Result<Message, LlmServiceError>>>,
    requests: Mutex<Vec<ChatRequest>>,
    delay: Duration,
}

impl MockChat {
    pub(crate) fn new(responses: Vec<Message>) -> Self {
        Self::with_results(responses.into_iter().map(Ok).collect())
    }

    pub(crate) fn with_results(responses: Vec<Result<Message, LlmServiceError>>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::from(responses)),
            requests: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
        }
    }

    /// Hold every reply for `delay` before answering.
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatService for MockChat {
    async fn complete(&self, request: ChatRequest) -> Result<Message, LlmServiceError> {
        self.requests.lock().unwrap().push(request);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmServiceError::InvalidResponse("No more responses".to_string())))
    }
}

pub(crate) fn tool_call_reply(id: &str, capability: &str) -> Message {
    tool_call_with_args(id, capability, Value::Null)
}

pub(crate) fn tool_call_with_args(id: &str, capability: &str, arguments: Value) -> Message {
    Message::assistant_tool_calls(None, vec![ToolCallRequest::new(id, capability, arguments)])
}

// ==================== Capabilities ====================

/// Capability returning a fixed output and recording its arguments.
pub(crate) struct StubCapability {
    descriptor: CapabilityDescriptor,
    output: String,
    seen: Mutex<Vec<BoundArguments>>,
}

impl StubCapability {
    pub(crate) fn with_descriptor(descriptor: CapabilityDescriptor, output: &str) -> Self {
        Self {
            descriptor,
            output: output.to_string(),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn arc(name: &str, output: &str) -> Arc<Self> {
        Arc::new(Self::with_descriptor(
            CapabilityDescriptor::new(name, format!("Stub for {name}")),
            output,
        ))
    }

    pub(crate) fn seen(&self) -> Vec<BoundArguments> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Capability for StubCapability {
    fn descriptor(&self) -> &CapabilityDescriptor {
        &self.descriptor
    }

    async fn invoke(
        &self,
        args: &BoundArguments,
        _cancellation: &CancellationToken,
    ) -> Result<String, CapabilityError> {
        self.seen.lock().unwrap().push(args.clone());
        Ok(self.output.clone())
    }
}

/// Capability whose image request always fails.
pub(crate) struct FailingImageCapability {
    descriptor: CapabilityDescriptor,
}

impl FailingImageCapability {
    pub(crate) fn new() -> Self {
        Self {
            descriptor: image_descriptor(),
        }
    }
}

#[async_trait]
impl Capability for FailingImageCapability {
    fn descriptor(&self) -> &CapabilityDescriptor {
        &self.descriptor
    }

    async fn invoke(
        &self,
        _args: &BoundArguments,
        _cancellation: &CancellationToken,
    ) -> Result<String, CapabilityError> {
        Err(ImageGenerationError::Status {
            code: 500,
            body: "image backend unavailable".to_string(),
        }
        .into())
    }
}

fn image_descriptor() -> CapabilityDescriptor {
    CapabilityDescriptor::new("create_image_from_text", "Creates an image from a text description")
        .with_parameter(ParameterSpec::new("description", ParamType::String))
}

pub(crate) struct DemoCapabilities {
    pub(crate) time: Arc<StubCapability>,
    pub(crate) weather: Arc<StubCapability>,
    pub(crate) image: Arc<StubCapability>,
}

/// Stubs for the three shipped capabilities, with their real descriptors.
pub(crate) fn demo_capabilities() -> DemoCapabilities {
    DemoCapabilities {
        time: Arc::new(StubCapability::with_descriptor(
            CapabilityDescriptor::new("get_current_utc_time", "Retrieves the current time in UTC"),
            FIXED_TIME,
        )),
        weather: Arc::new(StubCapability::with_descriptor(
            CapabilityDescriptor::new(
                "get_weather_for_city",
                "Gets the current weather for the specified city",
            )
            .with_parameter(ParameterSpec::new("city_name", ParamType::String)),
            WEATHER_SUMMARY,
        )),
        image: Arc::new(StubCapability::with_descriptor(image_descriptor(), IMAGE_RESULT)),
    }
}

impl DemoCapabilities {
    pub(crate) fn registry(&self) -> CapabilityRegistry {
        let mut registry = CapabilityRegistry::new();
        for capability in [&self.time, &self.weather, &self.image] {
            let capability: Arc<dyn Capability> = capability.clone();
            registry.register(capability).unwrap();
        }
        registry
    }
}

/// Registry whose image capability always fails.
pub(crate) fn registry_with_failing_image() -> CapabilityRegistry {
    let stubs = demo_capabilities();
    CapabilityRegistry::new()
        .with(stubs.time)
        .unwrap()
        .with(stubs.weather)
        .unwrap()
        .with(Arc::new(FailingImageCapability::new()))
        .unwrap()
}

/// Cancel `token` after `after` has elapsed.
pub(crate) fn cancel_after(token: &CancellationToken, after: Duration) {
    let token = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(after).await;
        token.cancel();
    });
}

pub(crate) fn city(name: &str) -> Value {
    json!({ "city_name": name })
}

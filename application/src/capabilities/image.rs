//! `create_image_from_text`
//!
//! Requests a 1024×1024 image and, concurrently, a short human-readable
//! confirmation. Both must succeed. An image failure is reported even if
//! the confirmation arrived or failed first.

use crate::ports::capability::{Capability, CapabilityError};
use crate::ports::chat_service::{ChatRequest, ChatService, SamplingOptions};
use crate::ports::image_service::ImageGenerator;
use crate::use_cases::shared::cancellable;
use async_trait::async_trait;
use orchestra_domain::{BoundArguments, CapabilityDescriptor, ParamType, ParameterSpec};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub const NAME: &str = "create_image_from_text";

pub const IMAGE_SIZE: (u32, u32) = (1024, 1024);

pub const CONFIRMATION_OPTIONS: SamplingOptions = SamplingOptions {
    max_tokens: Some(50),
    temperature: Some(1.0),
    top_p: Some(1.0),
};

pub struct CreateImageFromText {
    descriptor: CapabilityDescriptor,
    images: Arc<dyn ImageGenerator>,
    chat: Arc<dyn ChatService>,
}

impl CreateImageFromText {
    pub fn new(images: Arc<dyn ImageGenerator>, chat: Arc<dyn ChatService>) -> Self {
        Self {
            descriptor: CapabilityDescriptor::new(NAME, "Creates an image from a text description")
                .with_parameter(
                    ParameterSpec::new("description", ParamType::String)
                        .with_description("What the image should show"),
                ),
            images,
            chat,
        }
    }
}

fn confirmation_prompt(description: &str) -> String {
    format!(
        "Create a human response to tell the user that the image they requested has been created. \
         The prompt for the requested image is: {description}"
    )
}

#[async_trait]
impl Capability for CreateImageFromText {
    fn descriptor(&self) -> &CapabilityDescriptor {
        &self.descriptor
    }

    async fn invoke(
        &self,
        args: &BoundArguments,
        cancellation: &CancellationToken,
    ) -> Result<String, CapabilityError> {
        let description = args.require_str("description")?;
        let (width, height) = IMAGE_SIZE;

        let image = async {
            self.images
                .generate(description, width, height)
                .await
                .map_err(CapabilityError::from)
        };
        let confirmation = async {
            let request = ChatRequest::prompt(confirmation_prompt(description))
                .with_options(CONFIRMATION_OPTIONS);
            self.chat
                .complete(request)
                .await
                .map_err(CapabilityError::from)
        };

        let (url, message) = cancellable(cancellation, async { tokio::join!(image, confirmation) })
            .await
            .ok_or(CapabilityError::Cancelled)?;
        // The image error takes precedence over a failed confirmation
        let url = url?;
        let message = message?;

        info!(url = %url, "Image generated");
        Ok(format!("{} \n\n URL: {}", message.text().trim(), url))
    }
}

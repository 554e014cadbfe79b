//! Infrastructure layer for orchestra
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the Azure OpenAI chat and image services,
//! the Weatherstack weather source, the tool schema converter and
//! configuration file loading.

pub mod azure;
pub mod config;
pub mod http;
pub mod tools;
pub mod weather;

// Re-export commonly used types
pub use azure::{AzureOpenAiChatService, AzureOpenAiClient, AzureOpenAiImageGenerator};
pub use config::{
    ConfigLoader, ConfigValidationError, FileAzureOpenAiConfig, FileConfig, FileHttpConfig,
    FileOutputConfig, FilePlannerConfig, FileWeatherstackConfig,
};
pub use http::build_http_client;
pub use tools::JsonSchemaToolConverter;
pub use weather::WeatherstackSource;

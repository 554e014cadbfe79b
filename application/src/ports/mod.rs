//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod capability;
pub mod chat_service;
pub mod image_service;
pub mod progress;
pub mod tool_schema;
pub mod weather_source;

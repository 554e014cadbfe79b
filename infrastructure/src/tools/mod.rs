//! Tool declarations for the chat API
//!
//! Capabilities themselves live in the application layer; this module only
//! knows how to describe them to the model.

mod schema;

pub use schema::JsonSchemaToolConverter;

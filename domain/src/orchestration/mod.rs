//! Orchestration vocabulary
//!
//! The strategies themselves live in the application layer; the domain only
//! names them and defines the result of a completed run.

pub mod run;
pub mod strategy;

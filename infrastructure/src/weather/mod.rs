//! Weather data sources

mod weatherstack;

pub use weatherstack::{WeatherstackSource, check_payload};

//! Application-level configuration.
//!
//! - [`PlannerParams`] — loop bounds and failure handling for the strategies
//! - [`DEFAULT_GOAL`] — the goal used when none is given

pub mod planner_params;

pub use planner_params::{DEFAULT_GOAL, FailurePolicy, PlannerParams};

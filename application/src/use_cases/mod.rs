//! Use cases (application services)
//!
//! - [`strategy`]: the [`PlanningStrategy`](strategy::PlanningStrategy) seam
//! - [`bridge`]: executes tool-call requests against the registry
//! - [`stepwise`], [`template_plan`], [`auto_invoke`]: the three strategies
//! - [`run_demonstration`]: runs strategies in sequence against one goal

pub mod auto_invoke;
pub mod bridge;
pub mod run_demonstration;
pub(crate) mod shared;
pub mod stepwise;
pub mod strategy;
pub mod template_plan;

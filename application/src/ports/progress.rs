//! Progress notification port
//!
//! Defines the interface for reporting progress while the driver runs
//! strategies.

use orchestra_domain::StrategyKind;
use std::time::Duration;

/// Callback for progress updates during a demonstration run
///
/// Implementations live in the presentation layer.
pub trait StrategyProgressNotifier: Send + Sync {
    /// Called when a strategy starts
    fn on_strategy_start(&self, kind: StrategyKind);

    /// Called before a capability is invoked
    fn on_tool_call(&self, capability: &str);

    /// Called after a capability returns
    fn on_tool_result(&self, _capability: &str, _success: bool) {}

    /// Called when a strategy finishes, successfully or not
    fn on_strategy_complete(&self, kind: StrategyKind, success: bool, elapsed: Duration);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl StrategyProgressNotifier for NoProgress {
    fn on_strategy_start(&self, _kind: StrategyKind) {}
    fn on_tool_call(&self, _capability: &str) {}
    fn on_strategy_complete(&self, _kind: StrategyKind, _success: bool, _elapsed: Duration) {}
}

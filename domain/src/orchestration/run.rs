//! Result of a completed strategy run.

use crate::conversation::trace::ExecutionTrace;
use crate::orchestration::strategy::StrategyKind;
use serde::{Serialize, Serializer};
use std::time::Duration;

/// Outcome of one strategy that reached a final answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunResult {
    pub strategy: StrategyKind,
    pub final_answer: String,
    pub trace: ExecutionTrace,
    /// Wall-clock time from first request to final answer
    #[serde(rename = "elapsed_seconds", serialize_with = "as_seconds")]
    pub elapsed: Duration,
}

fn as_seconds<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(elapsed.as_secs_f64())
}

impl RunResult {
    pub fn new(
        strategy: StrategyKind,
        final_answer: impl Into<String>,
        trace: ExecutionTrace,
        elapsed: Duration,
    ) -> Self {
        Self {
            strategy,
            final_answer: final_answer.into(),
            trace,
            elapsed,
        }
    }

    /// Elapsed time in fractional seconds
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// Number of capability invocations recorded in the trace.
    pub fn tool_call_count(&self) -> usize {
        self.trace.tool_call_count()
    }
}

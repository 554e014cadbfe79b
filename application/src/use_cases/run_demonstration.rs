//! Run Demonstration use case
//!
//! Runs a list of strategies in sequence against one goal. Each strategy gets
//! a fresh trace and is timed independently. What happens after a failure is
//! decided by [`FailurePolicy`]; cancellation always stops the run.

use crate::config::FailurePolicy;
use crate::error::StrategyError;
use crate::ports::progress::{NoProgress, StrategyProgressNotifier};
use crate::registry::CapabilityRegistry;
use crate::use_cases::strategy::{PlanningStrategy, RunContext};
use orchestra_domain::{ExecutionTrace, RunResult, StrategyKind};
use serde::{Serialize, Serializer};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Outcome of one strategy
#[derive(Debug)]
pub enum RunOutcome {
    Completed(RunResult),
    /// The strategy ended with an error; the trace holds everything up to it
    Failed {
        strategy: StrategyKind,
        error: StrategyError,
        trace: ExecutionTrace,
        elapsed: Duration,
    },
}

impl Serialize for RunOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        #[serde(tag = "status", rename_all = "snake_case")]
        enum View<'a> {
            Completed(&'a RunResult),
            Failed {
                strategy: StrategyKind,
                error: String,
                error_kind: &'static str,
                trace: &'a ExecutionTrace,
                elapsed_seconds: f64,
            },
        }

        let view = match self {
            RunOutcome::Completed(result) => View::Completed(result),
            RunOutcome::Failed {
                strategy,
                error,
                trace,
                elapsed,
            } => View::Failed {
                strategy: *strategy,
                error: error.to_string(),
                error_kind: error.kind(),
                trace,
                elapsed_seconds: elapsed.as_secs_f64(),
            },
        };
        view.serialize(serializer)
    }
}

impl RunOutcome {
    pub fn strategy(&self) -> StrategyKind {
        match self {
            RunOutcome::Completed(result) => result.strategy,
            RunOutcome::Failed { strategy, .. } => *strategy,
        }
    }

    pub fn trace(&self) -> &ExecutionTrace {
        match self {
            RunOutcome::Completed(result) => &result.trace,
            RunOutcome::Failed { trace, .. } => trace,
        }
    }

    pub fn elapsed_seconds(&self) -> f64 {
        match self {
            RunOutcome::Completed(result) => result.elapsed_seconds(),
            RunOutcome::Failed { elapsed, .. } => elapsed.as_secs_f64(),
        }
    }

    pub fn error(&self) -> Option<&StrategyError> {
        match self {
            RunOutcome::Completed(_) => None,
            RunOutcome::Failed { error, .. } => Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Completed(_))
    }
}

/// Result of running all strategies
#[derive(Debug, Serialize)]
pub struct DemonstrationReport {
    pub goal: String,
    pub runs: Vec<RunOutcome>,
    /// Set when the run was stopped by the cancellation token
    pub cancelled: bool,
}

impl DemonstrationReport {
    pub fn is_success(&self) -> bool {
        !self.cancelled && self.runs.iter().all(RunOutcome::is_success)
    }
}

/// Use case for running strategies one after another
pub struct RunDemonstrationUseCase {
    registry: Arc<CapabilityRegistry>,
    strategies: Vec<Arc<dyn PlanningStrategy>>,
    policy: FailurePolicy,
}

impl RunDemonstrationUseCase {
    pub fn new(registry: Arc<CapabilityRegistry>, strategies: Vec<Arc<dyn PlanningStrategy>>) -> Self {
        Self {
            registry,
            strategies,
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Execute with default (no-op) progress and a token that never fires
    pub async fn execute(&self, goal: &str) -> DemonstrationReport {
        self.execute_with_progress(goal, &NoProgress, &CancellationToken::new())
            .await
    }

    /// Execute with progress callbacks and cancellation
    pub async fn execute_with_progress(
        &self,
        goal: &str,
        progress: &dyn StrategyProgressNotifier,
        cancellation: &CancellationToken,
    ) -> DemonstrationReport {
        let mut report = DemonstrationReport {
            goal: goal.to_string(),
            runs: Vec::with_capacity(self.strategies.len()),
            cancelled: false,
        };

        info!(
            "Running {} strategies with {} capabilities",
            self.strategies.len(),
            self.registry.len()
        );

        for strategy in &self.strategies {
            if cancellation.is_cancelled() {
                report.cancelled = true;
                break;
            }

            let kind = strategy.kind();
            info!("Starting strategy: {}", kind.display_name());
            progress.on_strategy_start(kind);

            let ctx = RunContext::new(&self.registry, cancellation, progress);
            let mut trace = ExecutionTrace::new();
            let started = Instant::now();
            let result = strategy.run(goal, &ctx, &mut trace).await;
            let elapsed = started.elapsed();

            progress.on_strategy_complete(kind, result.is_ok(), elapsed);

            match result {
                Ok(answer) => {
                    info!(
                        "Strategy {} finished in {:.2}s",
                        kind,
                        elapsed.as_secs_f64()
                    );
                    report
                        .runs
                        .push(RunOutcome::Completed(RunResult::new(kind, answer, trace, elapsed)));
                }
                Err(error) => {
                    let cancelled = error.is_cancelled();
                    warn!("Strategy {} failed: {}", kind, error);
                    report
                        .runs
                        .push(RunOutcome::Failed {
                            strategy: kind,
                            error,
                            trace,
                            elapsed,
                        });

                    if cancelled {
                        report.cancelled = true;
                        break;
                    }
                    if self.policy == FailurePolicy::Abort {
                        break;
                    }
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlannerParams;
    use crate::test_support::{MockChat, cancel_after, demo_capabilities};
    use crate::use_cases::stepwise::StepwisePlanner;
    use async_trait::async_trait;
    use orchestra_domain::Message;
    use std::sync::Mutex;

    /// Strategy with a canned outcome that records the trace it was given.
    struct ScriptedStrategy {
        kind: StrategyKind,
        fail_with: Mutex<Option<StrategyError>>,
        cancel: Option<CancellationToken>,
        trace_len_seen: Mutex<Option<usize>>,
    }

    impl ScriptedStrategy {
        fn ok(kind: StrategyKind) -> Arc<Self> {
            Arc::new(Self {
                kind,
                fail_with: Mutex::new(None),
                cancel: None,
                trace_len_seen: Mutex::new(None),
            })
        }

        fn failing(kind: StrategyKind, error: StrategyError) -> Arc<Self> {
            Arc::new(Self {
                kind,
                fail_with: Mutex::new(Some(error)),
                cancel: None,
                trace_len_seen: Mutex::new(None),
            })
        }

        fn cancelling(kind: StrategyKind, token: CancellationToken) -> Arc<Self> {
            Arc::new(Self {
                kind,
                fail_with: Mutex::new(Some(StrategyError::Cancelled)),
                cancel: Some(token),
                trace_len_seen: Mutex::new(None),
            })
        }

        fn ran(&self) -> bool {
            self.trace_len_seen.lock().unwrap().is_some()
        }
    }

    #[async_trait]
    impl PlanningStrategy for ScriptedStrategy {
        fn kind(&self) -> StrategyKind {
            self.kind
        }

        async fn run(
            &self,
            goal: &str,
            _ctx: &RunContext<'_>,
            trace: &mut ExecutionTrace,
        ) -> Result<String, StrategyError> {
            *self.trace_len_seen.lock().unwrap() = Some(trace.len());
            trace.push_user(goal);
            if let Some(token) = &self.cancel {
                token.cancel();
            }
            match self.fail_with.lock().unwrap().take() {
                Some(error) => Err(error),
                None => Ok(format!("{} answer", self.kind)),
            }
        }
    }

    fn use_case(strategies: &[&Arc<ScriptedStrategy>]) -> RunDemonstrationUseCase {
        let strategies = strategies
            .iter()
            .map(|s| Arc::clone(s) as Arc<dyn PlanningStrategy>)
            .collect();
        RunDemonstrationUseCase::new(Arc::new(demo_capabilities().registry()), strategies)
    }

    fn exhausted() -> StrategyError {
        StrategyError::PlannerExhausted(15)
    }

    #[tokio::test]
    async fn test_all_strategies_succeed_with_fresh_traces() {
        let first = ScriptedStrategy::ok(StrategyKind::Stepwise);
        let second = ScriptedStrategy::ok(StrategyKind::TemplatePlan);
        let third = ScriptedStrategy::ok(StrategyKind::AutoInvoke);

        let report = use_case(&[&first, &second, &third])
            .execute("goal")
            .await;

        assert!(report.is_success());
        assert_eq!(report.runs.len(), 3);
        for strategy in [&first, &second, &third] {
            assert_eq!(*strategy.trace_len_seen.lock().unwrap(), Some(0));
        }
        assert_eq!(
            report.runs.iter().map(|r| r.strategy()).collect::<Vec<_>>(),
            StrategyKind::all().to_vec()
        );
        match &report.runs[1] {
            RunOutcome::Completed(result) => {
                assert_eq!(result.final_answer, "template-plan answer");
                assert_eq!(result.trace.len(), 1);
            }
            other => panic!("Expected Completed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_abort_policy_stops_after_first_failure() {
        let first = ScriptedStrategy::failing(StrategyKind::Stepwise, exhausted());
        let second = ScriptedStrategy::ok(StrategyKind::TemplatePlan);

        let report = use_case(&[&first, &second]).execute("goal").await;

        assert!(!report.is_success());
        assert_eq!(report.runs.len(), 1);
        assert!(!second.ran());
        assert!(matches!(
            report.runs[0].error(),
            Some(StrategyError::PlannerExhausted(15))
        ));
        // Failed runs keep their partial trace
        assert_eq!(report.runs[0].trace().len(), 1);
    }

    #[tokio::test]
    async fn test_continue_policy_runs_remaining() {
        let first = ScriptedStrategy::failing(StrategyKind::Stepwise, exhausted());
        let second = ScriptedStrategy::ok(StrategyKind::TemplatePlan);

        let report = use_case(&[&first, &second])
            .with_failure_policy(FailurePolicy::Continue)
            .execute("goal")
            .await;

        assert_eq!(report.runs.len(), 2);
        assert!(second.ran());
        assert_eq!(report.runs.iter().filter(|r| !r.is_success()).count(), 1);
        assert!(!report.is_success());
    }

    #[tokio::test]
    async fn test_cancellation_stops_even_when_continuing() {
        let token = CancellationToken::new();
        let first = ScriptedStrategy::cancelling(StrategyKind::Stepwise, token.clone());
        let second = ScriptedStrategy::ok(StrategyKind::TemplatePlan);

        let report = use_case(&[&first, &second])
            .with_failure_policy(FailurePolicy::Continue)
            .execute_with_progress("goal", &NoProgress, &token)
            .await;

        assert!(report.cancelled);
        assert_eq!(report.runs.len(), 1);
        assert!(!second.ran());
    }

    #[tokio::test]
    async fn test_report_serializes_outcomes() {
        let first = ScriptedStrategy::ok(StrategyKind::Stepwise);
        let second = ScriptedStrategy::failing(StrategyKind::TemplatePlan, exhausted());

        let report = use_case(&[&first, &second]).execute("goal").await;
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["goal"], "goal");
        assert_eq!(json["runs"][0]["status"], "completed");
        assert_eq!(json["runs"][0]["final_answer"], "stepwise answer");
        assert_eq!(json["runs"][1]["status"], "failed");
        assert_eq!(json["runs"][1]["error_kind"], "planner_exhausted");
        assert!(json["runs"][1]["error"].as_str().unwrap().contains("15"));
    }

    #[tokio::test]
    async fn test_cancellation_during_pending_chat_request() {
        let chat = Arc::new(
            MockChat::new(vec![Message::assistant("too late")]).with_delay(Duration::from_secs(60)),
        );
        let stepwise: Arc<dyn PlanningStrategy> = Arc::new(StepwisePlanner::new(
            chat.clone(),
            PlannerParams::default().with_initial_plan(false),
        ));
        let after = ScriptedStrategy::ok(StrategyKind::AutoInvoke);
        let strategies = vec![stepwise, Arc::clone(&after) as Arc<dyn PlanningStrategy>];
        let token = CancellationToken::new();
        cancel_after(&token, Duration::from_millis(10));

        let report = RunDemonstrationUseCase::new(Arc::new(demo_capabilities().registry()), strategies)
            .with_failure_policy(FailurePolicy::Continue)
            .execute_with_progress("goal", &NoProgress, &token)
            .await;

        assert!(report.cancelled);
        assert_eq!(report.runs.len(), 1);
        assert!(matches!(report.runs[0].error(), Some(StrategyError::Cancelled)));
        assert_eq!(chat.request_count(), 1);
        assert!(!after.ran());
        // Partial trace: system prompt and goal only
        assert_eq!(report.runs[0].trace().len(), 2);
    }

}

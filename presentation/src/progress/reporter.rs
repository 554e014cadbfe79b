//! Progress reporting while strategies run

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use orchestra_application::StrategyProgressNotifier;
use orchestra_domain::StrategyKind;
use std::sync::Mutex;
use std::time::Duration;

/// Spinner per strategy, drawn on stderr
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(bar) = guard.as_ref() {
                f(bar);
            }
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl StrategyProgressNotifier for ProgressReporter {
    fn on_strategy_start(&self, kind: StrategyKind) {
        let bar = ProgressBar::new_spinner();
        bar.set_style(Self::spinner_style());
        bar.set_prefix(kind.display_name());
        bar.set_message("Thinking...");
        bar.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut guard) = self.bar.lock() {
            if let Some(previous) = guard.replace(bar) {
                previous.finish_and_clear();
            }
        }
    }

    fn on_tool_call(&self, capability: &str) {
        self.with_bar(|bar| bar.set_message(format!("Calling {}", capability)));
    }

    fn on_tool_result(&self, capability: &str, success: bool) {
        self.with_bar(|bar| {
            let status = if success {
                format!("{} {}", "v".green(), capability)
            } else {
                format!("{} {}", "x".red(), capability)
            };
            bar.set_message(status);
        });
    }

    fn on_strategy_complete(&self, kind: StrategyKind, success: bool, elapsed: Duration) {
        let Ok(mut guard) = self.bar.lock() else {
            return;
        };
        if let Some(bar) = guard.take() {
            let status = if success {
                "done".green()
            } else {
                "failed".red()
            };
            bar.finish_with_message(format!(
                "{} {} in {:.2}s",
                kind.display_name(),
                status,
                elapsed.as_secs_f64()
            ));
        }
    }
}

/// Simple line-based progress for non-interactive stderr
pub struct SimpleProgress;

impl StrategyProgressNotifier for SimpleProgress {
    fn on_strategy_start(&self, kind: StrategyKind) {
        eprintln!("{} {}", "->".cyan(), kind.display_name().bold());
    }

    fn on_tool_call(&self, capability: &str) {
        eprintln!("  {} {}", "..".dimmed(), capability);
    }

    fn on_tool_result(&self, capability: &str, success: bool) {
        if !success {
            eprintln!("  {} {} (failed)", "x".red(), capability);
        }
    }

    fn on_strategy_complete(&self, _kind: StrategyKind, success: bool, elapsed: Duration) {
        if success {
            eprintln!("  {} {:.2}s", "v".green(), elapsed.as_secs_f64());
        } else {
            eprintln!("  {} failed after {:.2}s", "x".red(), elapsed.as_secs_f64());
        }
    }
}

//! Console output formatter for demonstration reports

use colored::{ColoredString, Colorize};
use orchestra_application::{DemonstrationReport, RunOutcome};
use orchestra_domain::{ExecutionTrace, Message, OutputFormat, Role, ToolCallRequest};
use serde_json::Value;

/// Formats demonstration reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Render a report in the requested format
    pub fn render(report: &DemonstrationReport, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => Self::format(report),
            OutputFormat::Answer => Self::format_answers_only(report),
            OutputFormat::Json => Self::format_json(report),
        }
    }

    /// Format the complete report: one section per strategy, then a summary
    pub fn format(report: &DemonstrationReport) -> String {
        let mut output = String::new();

        output.push_str(&format!("{} {}\n", "Goal:".cyan().bold(), report.goal));

        for run in &report.runs {
            output.push('\n');
            output.push_str(&Self::header(run.strategy().display_name()));
            output.push('\n');
            output.push_str(&Self::format_trace(run.trace()));
            output.push('\n');
            output.push_str(&Self::outcome_lines(run));
        }

        output.push_str(&Self::section_header("Summary"));
        for run in &report.runs {
            let mark = if run.is_success() {
                "v".green()
            } else {
                "x".red()
            };
            output.push_str(&format!(
                "  {} {:<36} {:>8.2}s\n",
                mark,
                run.strategy().display_name(),
                run.elapsed_seconds()
            ));
        }
        if report.cancelled {
            output.push_str(&format!("\n{}\n", "Run cancelled".yellow().bold()));
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(report: &DemonstrationReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format final answers only (concise output)
    pub fn format_answers_only(report: &DemonstrationReport) -> String {
        let mut output = String::new();

        for run in &report.runs {
            let name = run.strategy().display_name();
            match run {
                RunOutcome::Completed(result) => {
                    output.push_str(&format!("{}\n{}\n\n", name.cyan().bold(), result.final_answer));
                }
                RunOutcome::Failed { error, .. } => {
                    output.push_str(&format!(
                        "{}\n{} {}\n\n",
                        name.cyan().bold(),
                        "Error:".red().bold(),
                        error
                    ));
                }
            }
        }
        if report.cancelled {
            output.push_str(&format!("{}\n", "Run cancelled".yellow().bold()));
        }

        output
    }

    /// Render a trace, one role-coloured block per message
    pub fn format_trace(trace: &ExecutionTrace) -> String {
        trace
            .iter()
            .map(Self::format_message)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn format_message(message: &Message) -> String {
        let label = match message.role {
            Role::Tool => format!(
                "tool ({})",
                message.name.as_deref().unwrap_or("unknown")
            ),
            role => role.to_string(),
        };

        let mut lines = Vec::new();
        if !message.text().is_empty() {
            lines.push(message.text().to_string());
        }
        for call in &message.tool_calls {
            lines.push(format!("-> {}", Self::format_call(call)));
        }

        format!(
            "{}\n{}\n",
            Self::paint(message.role, &format!("{label}:")).bold(),
            Self::paint(message.role, &Self::indent(&lines.join("\n"), "  "))
        )
    }

    fn format_call(call: &ToolCallRequest) -> String {
        let arguments = match &call.arguments {
            Value::Null => "{}".to_string(),
            other => other.to_string(),
        };
        format!("{}({})", call.capability, arguments)
    }

    fn outcome_lines(run: &RunOutcome) -> String {
        let mut output = String::new();
        match run {
            RunOutcome::Completed(result) => {
                output.push_str(&format!(
                    "{} {}\n",
                    "Execution result:".green().bold(),
                    result.final_answer
                ));
            }
            RunOutcome::Failed { error, .. } => {
                output.push_str(&format!(
                    "{} {} ({})\n",
                    "Execution failed:".red().bold(),
                    error,
                    error.kind()
                ));
            }
        }
        output.push_str(&format!(
            "{} {:.2} s\n",
            "Total time:".cyan().bold(),
            run.elapsed_seconds()
        ));
        output
    }

    fn paint(role: Role, text: &str) -> ColoredString {
        match role {
            Role::System => text.blue(),
            Role::User => text.green(),
            Role::Assistant => text.yellow(),
            Role::Tool => text.magenta(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

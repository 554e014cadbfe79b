//! CLI command definitions

use clap::{Parser, ValueEnum};
use orchestra_domain::{OutputFormat, StrategyKind};
use std::path::PathBuf;

/// Output format for demonstration reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    /// Every trace followed by each strategy's answer and timing
    Full,
    /// Only the final answers
    Answer,
    /// The whole report as JSON
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Full => OutputFormat::Full,
            OutputFormatArg::Answer => OutputFormat::Answer,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

/// CLI arguments for orchestra
#[derive(Parser, Debug)]
#[command(name = "orchestra")]
#[command(author, version, about = "Drive one goal through three LLM tool-orchestration strategies")]
#[command(long_about = r#"
Orchestra runs a natural-language goal through three planning strategies
over the same set of tools (current UTC time, weather by city, image
generation) and prints each strategy's conversation, answer and timing.

Strategies (run in this order unless --strategy is given):
1. stepwise        Ask the model for the next tool call until it answers
2. template-plan   Compile a whole plan up front, then execute it
3. auto-invoke     One request; tool calls are resolved inside the turn

Configuration files are loaded from (in priority order):
1. ORCHESTRA_* environment variables (e.g. ORCHESTRA_AZURE_OPENAI__KEY)
2. --config <path>        Explicit config file
3. ./orchestra.toml       Project-level config
4. ~/.config/orchestra/config.toml   Global config

Example:
  orchestra
  orchestra "What time is it in UTC?" --strategy stepwise
  orchestra -o json --strategy template-plan --strategy auto-invoke
"#)]
pub struct Cli {
    /// The goal to pursue (defaults to [planner].goal, then the built-in demo goal)
    pub goal: Option<String>,

    /// Strategies to run (can be specified multiple times)
    #[arg(short, long, value_name = "STRATEGY")]
    pub strategy: Vec<StrategyKind>,

    /// Output format (defaults to [output].format, then full)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormatArg>,

    /// Keep running the remaining strategies after one fails
    #[arg(long)]
    pub continue_on_failure: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Strategies to run, in canonical order when none were named.
    pub fn strategies(&self) -> Vec<StrategyKind> {
        if self.strategy.is_empty() {
            return StrategyKind::all().to_vec();
        }
        let mut selected = Vec::with_capacity(self.strategy.len());
        for kind in &self.strategy {
            if !selected.contains(kind) {
                selected.push(*kind);
            }
        }
        selected
    }
}

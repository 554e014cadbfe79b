//! CLI entrypoint for orchestra
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use orchestra_application::{
    AutoInvokeStrategy, CapabilityRegistry, ChatService, CreateImageFromText,
    DemonstrationReport, FailurePolicy, GetCurrentUtcTime, GetWeatherForCity, ImageGenerator,
    NoProgress, PlannerParams, PlanningStrategy, RunDemonstrationUseCase, StepwisePlanner,
    StrategyProgressNotifier, TemplatePlanCompiler, WeatherSource,
};
use orchestra_domain::{OutputFormat, StrategyKind};
use orchestra_infrastructure::{
    AzureOpenAiChatService, AzureOpenAiClient, AzureOpenAiImageGenerator, ConfigLoader,
    FileConfig, WeatherstackSource, build_http_client,
};
use orchestra_presentation::{Cli, ConsoleFormatter, ProgressReporter, SimpleProgress};
use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Conventional exit status after SIGINT
const EXIT_CANCELLED: u8 = 130;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Held until exit so buffered file logs are flushed
    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(ExitCode::SUCCESS);
    }

    info!("Starting orchestra");

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
    }
    .map_err(|e| anyhow!("Failed to load configuration: {e}"))?;

    let issues = config.validate();
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("config error: {issue}");
        }
        bail!(
            "Invalid configuration ({} issue(s)); run with --show-config to see where settings are read from",
            issues.len()
        );
    }

    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }

    // === Dependency Injection ===
    let http = build_http_client(config.http.timeout()).context("Failed to build HTTP client")?;
    let azure = &config.azure_openai;
    let client = AzureOpenAiClient::new(
        http.clone(),
        &azure.endpoint,
        &azure.key,
        &azure.api_version,
    );
    let chat: Arc<dyn ChatService> = Arc::new(AzureOpenAiChatService::new(
        client.clone(),
        &azure.chat_deployment,
        &azure.chat_model,
    ));
    let images: Arc<dyn ImageGenerator> = Arc::new(AzureOpenAiImageGenerator::new(
        client,
        &azure.image_deployment,
        &azure.image_model,
    ));
    let weather: Arc<dyn WeatherSource> = Arc::new(WeatherstackSource::new(
        http,
        &config.weatherstack.base_url,
        &config.weatherstack.access_key,
    ));

    let registry = build_registry(chat.clone(), weather, images)?;

    let mut params = config.planner.to_planner_params();
    if cli.continue_on_failure {
        params = params.with_failure_policy(FailurePolicy::Continue);
    }
    let strategies = build_strategies(&cli.strategies(), &chat, &params);

    let goal = cli
        .goal
        .clone()
        .unwrap_or_else(|| config.planner.goal().to_string());
    let format = output_format(&cli, &config);

    info!(
        "Goal: {} ({} strategies, failure policy {})",
        goal,
        strategies.len(),
        params.failure_policy
    );

    let use_case = RunDemonstrationUseCase::new(Arc::new(registry), strategies)
        .with_failure_policy(params.failure_policy);

    let cancellation = CancellationToken::new();
    let ctrl_c = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling run");
            ctrl_c.cancel();
        }
    });

    let progress: Box<dyn StrategyProgressNotifier> = if cli.quiet || format == OutputFormat::Json
    {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };

    let report = use_case
        .execute_with_progress(&goal, progress.as_ref(), &cancellation)
        .await;

    println!("{}", ConsoleFormatter::render(&report, format));

    Ok(ExitCode::from(exit_status(&report)))
}

/// Install the tracing subscriber: stderr always, plus a file when asked.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .with_context(|| format!("Invalid log file path: {}", path.display()))?;
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(file_layer)
        .init();

    Ok(guard)
}

fn build_registry(
    chat: Arc<dyn ChatService>,
    weather: Arc<dyn WeatherSource>,
    images: Arc<dyn ImageGenerator>,
) -> Result<CapabilityRegistry> {
    let registry = CapabilityRegistry::new()
        .with(Arc::new(GetCurrentUtcTime::new()))?
        .with(Arc::new(GetWeatherForCity::new(weather, chat.clone())))?
        .with(Arc::new(CreateImageFromText::new(images, chat)))?;
    Ok(registry)
}

fn build_strategies(
    kinds: &[StrategyKind],
    chat: &Arc<dyn ChatService>,
    params: &PlannerParams,
) -> Vec<Arc<dyn PlanningStrategy>> {
    kinds
        .iter()
        .map(|kind| -> Arc<dyn PlanningStrategy> {
            match kind {
                StrategyKind::Stepwise => Arc::new(StepwisePlanner::new(chat.clone(), params.clone())),
                StrategyKind::TemplatePlan => Arc::new(TemplatePlanCompiler::new(chat.clone())),
                StrategyKind::AutoInvoke => {
                    Arc::new(AutoInvokeStrategy::new(chat.clone(), params.clone()))
                }
            }
        })
        .collect()
}

/// Command line wins over the config file; both fall back to full output.
fn output_format(cli: &Cli, config: &FileConfig) -> OutputFormat {
    cli.output
        .map(OutputFormat::from)
        .or(config.output.format)
        .unwrap_or_default()
}

fn exit_status(report: &DemonstrationReport) -> u8 {
    if report.cancelled {
        EXIT_CANCELLED
    } else if report.is_success() {
        0
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orchestra_application::{ChatRequest, LlmServiceError};
    use orchestra_domain::Message;

    struct SilentChat;

    #[async_trait::async_trait]
    impl ChatService for SilentChat {
        async fn complete(&self, _request: ChatRequest) -> Result<Message, LlmServiceError> {
            Err(LlmServiceError::EmptyResponse)
        }
    }

    #[test]
    fn test_strategies_follow_requested_order() {
        let chat: Arc<dyn ChatService> = Arc::new(SilentChat);
        let strategies = build_strategies(
            &[StrategyKind::AutoInvoke, StrategyKind::Stepwise],
            &chat,
            &PlannerParams::default(),
        );
        let kinds: Vec<StrategyKind> = strategies.iter().map(|s| s.kind()).collect();
        assert_eq!(kinds, vec![StrategyKind::AutoInvoke, StrategyKind::Stepwise]);
    }

    #[test]
    fn test_output_format_precedence() {
        let mut config = FileConfig::default();
        config.output.format = Some(OutputFormat::Answer);

        let cli = Cli::parse_from(["orchestra"]);
        assert_eq!(output_format(&cli, &config), OutputFormat::Answer);

        let cli = Cli::parse_from(["orchestra", "-o", "json"]);
        assert_eq!(output_format(&cli, &config), OutputFormat::Json);

        let cli = Cli::parse_from(["orchestra"]);
        assert_eq!(output_format(&cli, &FileConfig::default()), OutputFormat::Full);
    }

    #[test]
    fn test_exit_codes() {
        let mut report = DemonstrationReport {
            goal: "goal".to_string(),
            runs: Vec::new(),
            cancelled: false,
        };
        assert_eq!(exit_status(&report), 0);

        report.runs.push(orchestra_application::RunOutcome::Failed {
            strategy: StrategyKind::Stepwise,
            error: orchestra_application::StrategyError::PlannerExhausted(15),
            trace: orchestra_domain::ExecutionTrace::new(),
            elapsed: std::time::Duration::ZERO,
        });
        assert_eq!(exit_status(&report), 1);

        report.cancelled = true;
        assert_eq!(exit_status(&report), EXIT_CANCELLED);
    }
}

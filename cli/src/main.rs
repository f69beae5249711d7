//! CLI entrypoint for tripwise
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tripwise_application::{ConversationLogger, NoProgress, ProcessMessageUseCase};
use tripwise_infrastructure::{
    ConfigLoader, FileConfig, JsonlConversationLogger, OpenAiCompatibleGateway, build_registry,
};
use tripwise_presentation::{ChatRepl, Cli, ConsoleFormatter, OutputFormat, ProgressReporter};

/// Initialize logging. `RUST_LOG` wins over the verbosity flag; with a log
/// file, output goes there instead of stderr.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("invalid log file path: {}", path.display()))?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("cannot create log directory {}", dir.display()))?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).context("failed to load configuration")?
    };

    if let Some(model) = &cli.model {
        config.llm.model = model.clone();
    }

    let problems = config.validate();
    if !problems.is_empty() {
        let list: Vec<String> = problems.iter().map(|p| format!("  - {}", p)).collect();
        bail!("invalid configuration:\n{}", list.join("\n"));
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.show_config {
        for line in ConfigLoader::describe_sources(cli.config.as_deref()) {
            println!("{}", line);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;
    info!("Starting tripwise");

    let config = load_config(&cli)?;
    let params = config.assistant.to_params();

    // === Dependency Injection ===
    let gateway = Arc::new(OpenAiCompatibleGateway::from_config(&config.llm)?);
    let registry = Arc::new(build_registry(&config.tools, params.tool_timeout)?);

    let mut use_case = ProcessMessageUseCase::new(gateway, registry, params)?;

    let log_path = cli
        .conversation_log
        .clone()
        .or_else(|| config.logging.conversation_log_path());
    if let Some(logger) = log_path.and_then(JsonlConversationLogger::open) {
        info!("Conversation log: {}", logger.path().display());
        let logger: Arc<dyn ConversationLogger> = Arc::new(logger);
        use_case = use_case.with_conversation_logger(logger);
    }

    // Chat mode
    if cli.chat {
        let mut repl = ChatRepl::new(use_case).with_progress(!cli.quiet);
        repl.run().await?;
        return Ok(ExitCode::SUCCESS);
    }

    // Single question mode - question is required
    let Some(question) = cli.question.as_deref() else {
        bail!("Question is required. Use --chat for interactive mode.");
    };

    let format = cli.output_format();
    let show_progress = !cli.quiet && format != OutputFormat::Json;
    let outcome = if show_progress {
        let progress = ProgressReporter::new();
        let outcome = use_case.process_message(question, &progress).await;
        progress.finish();
        outcome
    } else {
        use_case.process_message(question, &NoProgress).await
    };

    let output = match format {
        OutputFormat::Full => ConsoleFormatter::format(&outcome),
        OutputFormat::Answer => ConsoleFormatter::format_answer_only(&outcome),
        OutputFormat::Json => format!("{}\n", ConsoleFormatter::format_json(&outcome)),
    };
    print!("{}", output);

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

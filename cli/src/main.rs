//! CLI entrypoint for AI Code Helper
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use code_helper_application::{ChatSessionService, GuardedChatUseCase, InputGuardrail};
use code_helper_domain::ConversationId;
use code_helper_infrastructure::{
    ConfigLoader, ConfiguredTerms, FileConfig, InMemoryChatMemory, OpenAiCompatibleChatModel,
    SensitiveWordGuardrail, prompt_source,
};
use code_helper_presentation::{
    ChatRepl, Cli, ConsoleFormatter, ProgressReporter, SilentProgress, TurnOutcome, TurnProgress,
    run_turn,
};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Exit status when the guardrail refuses the message
const EXIT_REJECTED: u8 = 2;
/// Exit status when Ctrl-C stops the reply
const EXIT_CANCELLED: u8 = 130;

/// Stderr logging, plus a plain-text file when `--log-file` is given.
///
/// `RUST_LOG` overrides the level chosen by `-v`.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            };
            let file_name = path
                .file_name()
                .with_context(|| format!("--log-file {} has no file name", path.display()))?;
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Cannot create log directory {}", dir.display()))?;

            let appender = tracing_appender::rolling::never(dir, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?
    };

    let issues = config.validate();
    for issue in issues.iter().filter(|i| !i.is_error()) {
        warn!("{}", issue.message);
    }
    let errors: Vec<String> = issues
        .iter()
        .filter(|i| i.is_error())
        .map(|i| i.message.clone())
        .collect();
    if !errors.is_empty() {
        bail!("Invalid configuration:\n  {}", errors.join("\n  "));
    }

    Ok(config)
}

/// Assemble the guarded chat use case from configuration.
///
/// Everything that can fail at startup fails here: missing API key,
/// unreadable system prompt, unreadable dictionary file.
fn build_use_case(config: &FileConfig) -> Result<GuardedChatUseCase> {
    let chat_config = config.ai.chat.to_chat_config();

    let model = Arc::new(
        OpenAiCompatibleChatModel::from_config(&config.ai.model)
            .context("Cannot configure the chat model")?,
    );
    let memory = Arc::new(InMemoryChatMemory::from_config(&chat_config)?);
    let prompt = prompt_source(config.ai.chat.system_prompt_path.as_deref());

    let session = ChatSessionService::new(model, memory, prompt.as_ref(), chat_config)
        .context("Cannot start the chat service")?;

    let guardrail_config = config.ai.guardrail.to_guardrail_config();
    let terms = if guardrail_config.enabled {
        ConfiguredTerms::from_config(&config.ai.guardrail)?
    } else {
        ConfiguredTerms::default()
    };
    let guardrail = SensitiveWordGuardrail::new(guardrail_config, Arc::new(terms));
    guardrail.warm_up();
    let guardrail: Arc<dyn InputGuardrail> = Arc::new(guardrail);

    info!(
        guardrail = guardrail_config.enabled,
        case_sensitive = guardrail_config.case_sensitive,
        "Chat service ready"
    );
    Ok(GuardedChatUseCase::new(guardrail, session))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(ExitCode::SUCCESS);
    }

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    info!("Starting AI Code Helper");

    let config = load_config(&cli)?;

    // === Dependency Injection ===
    let use_case = build_use_case(&config)?;
    let conversation_id = ConversationId::new(cli.conversation);

    // Chat mode
    if cli.chat {
        let mut repl = ChatRepl::new(use_case, conversation_id).with_progress(!cli.quiet);
        repl.run().await?;
        return Ok(ExitCode::SUCCESS);
    }

    // Single message mode - message is required
    let message = match cli.message {
        Some(m) => m,
        None => bail!("Message is required. Use --chat for interactive mode."),
    };

    let progress: Box<dyn TurnProgress> = if cli.quiet {
        Box::new(SilentProgress)
    } else {
        Box::new(ProgressReporter::new())
    };
    let cancel = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    let mut stdout = std::io::stdout();
    let outcome = run_turn(
        &use_case,
        conversation_id,
        &message,
        &mut stdout,
        progress.as_ref(),
        cancel,
    )
    .await;

    match outcome {
        TurnOutcome::Completed => {
            println!();
            Ok(ExitCode::SUCCESS)
        }
        TurnOutcome::Rejected(reason) => {
            eprintln!("{}", ConsoleFormatter::rejection(&reason));
            Ok(ExitCode::from(EXIT_REJECTED))
        }
        TurnOutcome::Cancelled => {
            println!();
            eprintln!("{}", ConsoleFormatter::cancelled());
            Ok(ExitCode::from(EXIT_CANCELLED))
        }
        TurnOutcome::Failed(e) => {
            println!();
            Err(e.into())
        }
        TurnOutcome::OutputFailed(e) => Err(e.into()),
    }
}

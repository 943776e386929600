//! CLI entrypoint for agora
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use agora_application::{
    ConversationLogger, KnowledgeGraphPort, NoConversationLogger, NoProgress, RebuildSignal,
    RunSessionInput, RunSessionUseCase, ScriptRunner, SessionReport, TurnPorts, WorkQueue,
};
use agora_infrastructure::{
    ConfigLoader, DisabledScriptRunner, FileConfig, GraphReloader, InMemoryWorkQueue,
    JsonGraphStore, JsonSessionStore, JsonlConversationLogger, OpenRouterGateway,
    ProcessScriptRunner, SpoolQueue,
};
use agora_presentation::{Cli, ConsoleFormatter, ProgressReporter, SimpleProgress};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Console logs go to stderr; `log_dir` adds a daily-rolling file
fn init_tracing(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "agora.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(EnvFilter::new(level));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(EnvFilter::new(level)),
        )
        .with(file_layer)
        .init();

    guard
}

fn report_issues(config: &FileConfig) {
    let env = |name: &str| std::env::var(name).ok();
    for issue in config
        .validate()
        .into_iter()
        .chain(config.api_key_issue(env))
    {
        warn!("{}", issue.message);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        for line in ConfigLoader::describe_sources(cli.config.as_deref()) {
            println!("{}", line);
        }
        return Ok(());
    }

    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())?
    };

    let _log_guard = init_tracing(cli.verbose, file_config.logging.log_dir.as_deref());
    info!("Starting agora");
    report_issues(&file_config);

    let engine_config = file_config.to_engine_config()?;
    let cancellation = CancellationToken::new();

    // === Dependency Injection ===
    let reasoning = &file_config.reasoning;
    let api_key = std::env::var(&reasoning.api_key_env).unwrap_or_default();
    let gateway = Arc::new(OpenRouterGateway::new(
        &reasoning.base_url,
        api_key,
        reasoning.timeout(),
    )?);

    let graph_store = Arc::new(JsonGraphStore::new(
        &file_config.graph.path,
        &file_config.graph.examples_path,
    ));
    if let Err(e) = graph_store.reload_if_changed().await {
        warn!(
            "Knowledge graph not available yet ({}): {}",
            file_config.graph.path.display(),
            e
        );
    }
    let reloader = GraphReloader::new(graph_store.clone(), file_config.graph.poll_interval())
        .spawn(cancellation.child_token());

    let queue: Arc<dyn WorkQueue> = match &file_config.queue.spool_dir {
        Some(dir) => Arc::new(SpoolQueue::open(&file_config.queue.name, dir)?),
        None => Arc::new(InMemoryWorkQueue::new(&file_config.queue.name)),
    };

    let generation = &file_config.generation;
    let scripts: Arc<dyn ScriptRunner> = match generation
        .interpreter
        .as_deref()
        .and_then(|interpreter| ProcessScriptRunner::new(interpreter, generation.timeout()))
    {
        Some(runner) => Arc::new(runner),
        None => Arc::new(DisabledScriptRunner),
    };

    let logger: Arc<dyn ConversationLogger> = match file_config
        .logging
        .conversation_log
        .as_ref()
        .and_then(JsonlConversationLogger::open)
    {
        Some(logger) => {
            info!("Transcript: {}", logger.path().display());
            Arc::new(logger)
        }
        None => Arc::new(NoConversationLogger),
    };

    let graph: Arc<dyn KnowledgeGraphPort> = graph_store.clone();
    let rebuild: Arc<dyn RebuildSignal> = graph_store;
    let ports = TurnPorts {
        gateway,
        graph,
        rebuild,
        queue,
        scripts,
    };
    let store = Arc::new(JsonSessionStore::new(&file_config.session.state_path));

    // Ctrl-C stops the session at the next turn boundary
    {
        let token = cancellation.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted; stopping after the current turn");
                token.cancel();
            }
        });
    }

    let mut input = RunSessionInput::new();
    if let Some(rounds) = cli.rounds.or(file_config.session.max_rounds) {
        input = input.with_max_rounds(rounds);
    }
    if let Some(turns) = cli.turns {
        input = input.with_turn_budget(turns);
    }
    if cli.fresh {
        input = input.fresh();
    }

    if !cli.quiet {
        println!();
        print!(
            "{}",
            ConsoleFormatter::header(&engine_config, &file_config.session.state_path)
        );
    }

    let use_case = RunSessionUseCase::new(engine_config, ports, store)
        .with_conversation_logger(logger)
        .with_cancellation(cancellation.clone());

    let result: Result<SessionReport> = if cli.quiet {
        use_case
            .execute(input, &NoProgress)
            .await
            .context("session failed")
    } else if !std::io::stderr().is_terminal() {
        use_case
            .execute(input, &SimpleProgress)
            .await
            .context("session failed")
    } else {
        let progress = ProgressReporter::new();
        let result = use_case.execute(input, &progress).await;
        progress.finish();
        result.context("session failed")
    };

    cancellation.cancel();
    if let Err(e) = reloader.await {
        warn!("Graph reloader ended abnormally: {}", e);
    }

    let report = result?;
    if !cli.quiet {
        print!("{}", ConsoleFormatter::summary(&report));
    }

    Ok(())
}

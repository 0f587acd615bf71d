//! commitcraft - CLI entry point.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use commitcraft::commit::{GenerateCommitMessage, InMemoryHistory};
use commitcraft::config::Config;
use commitcraft::git::{GitCli, find_workdir};
use commitcraft::llm::{BackendMode, GenerationService, LlmBackend, ModelId, resolve_model};
use commitcraft::session::{Outcome, Session};
use commitcraft::ui::TerminalConsole;

/// Generate a git commit message for the staged changes using an LLM.
#[derive(Parser, Debug)]
#[command(name = "commitcraft")]
#[command(about = "Generate a git commit message for the staged changes using an LLM")]
#[command(version)]
struct Cli {
    /// Path to a config file (defaults to ./commitcraft.toml, then the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend to use: local, openrouter, groq, claude-code, codex
    #[arg(short, long)]
    backend: Option<BackendMode>,

    /// Model identifier (skips model discovery)
    #[arg(short, long)]
    model: Option<String>,

    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "commitcraft=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Step 1: Load and validate configuration
    let config = Config::load(cli.config.as_deref(), cli.backend)
        .context("Failed to load configuration")?;
    config.validate()?;
    debug!("Using {} backend", config.backend);

    // Step 2: Check prerequisites
    config
        .backend
        .check_prerequisites()
        .with_context(|| format!("The {} backend is not available", config.backend))?;

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let workdir = find_workdir(&cwd)
        .context("Not a git repository. Run commitcraft from within a git repository.")?;

    let mut console = TerminalConsole::new();
    console.banner(config.backend.as_str());

    // Step 3: Pick the model
    let backend = Arc::new(LlmBackend::from_config(&config));
    let configured = match cli.model {
        Some(id) => Some(ModelId::new(id).context("Invalid --model value")?),
        None => config.configured_model()?,
    };

    println!("Resolving model for {} backend...", config.backend);
    let model = resolve_model(&*backend, configured, config.fallback_model()?)
        .await
        .context("Failed to list available models")?;
    println!("Using model '{}'", model);

    // Step 4: Generate and run the interactive loop
    let use_case = GenerateCommitMessage::new(
        Arc::new(GitCli::new(workdir)),
        GenerationService::new(backend),
        Arc::new(InMemoryHistory::new()),
    );

    let mut session = Session::new(&use_case, model, config.system_prompt.as_str(), console);
    let outcome = session.run().await?;
    debug!("Session ended: {:?}", outcome);

    if let Outcome::Committed(message) = outcome {
        debug!("Committed {}", message.shell_quoted());
    }

    Ok(())
}

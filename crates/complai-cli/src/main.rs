//! # complai CLI entry point
//!
//! Parses command-line arguments, builds the API client and dispatches to
//! subcommand handlers.

use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use complai_api_client::{ApiConfig, ComplaiClient};
use complai_cli::clients::{run_clients, ClientsArgs};
use complai_cli::import::{run_import, ImportArgs};
use complai_cli::output::Format;
use complai_cli::tasks::{run_tasks, TasksArgs};

/// ComplAI CLI
///
/// Compliance tasks and clients for a CA practice, from the terminal.
#[derive(Parser, Debug)]
#[command(name = "complai", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    backend: BackendArgs,

    /// Print raw JSON envelopes instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compliance tasks, comments and documents.
    Tasks(TasksArgs),

    /// Client records.
    Clients(ClientsArgs),

    /// Task sheet tools that do not need the backend.
    Import(ImportArgs),
}

/// How to reach the backend. Flags win over environment variables.
#[derive(clap::Args, Debug)]
struct BackendArgs {
    /// Backend base URL. Overrides VITE_REACT_APP_API_URL.
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Bearer token for the backend.
    #[arg(long, global = true, env = "COMPLAI_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
}

impl BackendArgs {
    fn api_config(&self) -> anyhow::Result<ApiConfig> {
        let mut config = ApiConfig::from_env()?;
        if let Some(url) = &self.api_url {
            config = config.with_base_url(url)?;
        }
        if let Some(token) = self.token.as_deref().filter(|t| !t.trim().is_empty()) {
            config = config.with_token(token);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout_secs(secs);
        }
        Ok(config)
    }

    fn connect(&self) -> anyhow::Result<ComplaiClient> {
        let config = self.api_config().context("invalid backend configuration")?;
        tracing::debug!(base_url = %config.base_url(), "using backend");
        Ok(ComplaiClient::new(config)?)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let format = if cli.json { Format::Json } else { Format::Text };

    match run(cli, format).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli, format: Format) -> anyhow::Result<u8> {
    match cli.command {
        Commands::Tasks(args) => run_tasks(args, &cli.backend.connect()?, format).await,
        Commands::Clients(args) => run_clients(args, &cli.backend.connect()?, format).await,
        Commands::Import(args) => run_import(args, format).await,
    }
}

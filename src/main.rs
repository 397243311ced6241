pub mod api;
pub mod app;
pub mod auth;
pub mod cli;
pub mod command;
pub mod config;
pub mod event;
pub mod install_prompt;
pub mod local_state;
pub mod replies;
pub mod store;
pub mod ui;

use app::App;
use clap::Parser;
use cli::{Cli, CliCommand};
use color_eyre::eyre::eyre;
use command::parse_status_ref;
use config::load_config;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    // Initialize tracing (logs to stderr if RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        // No subcommand or explicit `tui` → launch the interactive TUI.
        None => run_tui(None).await,
        Some(CliCommand::Tui { status }) => run_tui(status).await,
        // All other subcommands → non-interactive JSONL output.
        Some(cmd) => cli::run_command(cmd).await,
    }
}

/// Launch the interactive TUI, optionally opening a status right away.
async fn run_tui(status: Option<String>) -> color_eyre::Result<()> {
    let config = load_config();

    let initial_status = status
        .map(|s| parse_status_ref(&s).ok_or_else(|| eyre!("not a status ID or URL: {s}")))
        .transpose()?;

    // Tolerate a broken environment: the TUI can still show help etc.
    let api_client = match cli::build_api_client(&config) {
        Ok(client) => {
            tracing::info!(
                instance = client.base_url(),
                signed_in = client.signed_in(),
                "api client initialized"
            );
            Some(client)
        }
        Err(e) => {
            tracing::warn!("api client setup failed: {e}");
            eprintln!("Warning: {e}. Running without API access.");
            None
        }
    };

    let terminal = ratatui::init();
    let result = App::new(config, api_client)
        .run(terminal, initial_status)
        .await;
    ratatui::restore();
    result
}

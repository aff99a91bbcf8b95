pub mod app;
pub mod auth;
pub mod browse;
pub mod catalog;
pub mod cli;
pub mod command;
pub mod config;
pub mod event;
pub mod screen;
pub mod ui;

use std::sync::Arc;

use app::App;
use catalog::http::HttpCatalogClient;
use clap::Parser;
use cli::{Cli, CliCommand};
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
        None | Some(CliCommand::Tui) => run_tui().await,
        // All other subcommands → non-interactive output.
        Some(cmd) => cli::run_command(cmd).await,
    }
}

/// Launch the interactive TUI.
async fn run_tui() -> color_eyre::Result<()> {
    auth::load_env_files();
    let config = load_config();
    let client = HttpCatalogClient::new(&config.base_url)?;
    tracing::info!(base_url = %client.base_url(), "catalog client ready");

    let terminal = ratatui::init();
    // Focus events drive the stale-data reload when the terminal comes back.
    crossterm::execute!(std::io::stdout(), crossterm::event::EnableFocusChange)?;
    let result = App::new(config, Arc::new(client)).run(terminal).await;
    let _ = crossterm::execute!(std::io::stdout(), crossterm::event::DisableFocusChange);
    ratatui::restore();
    result
}

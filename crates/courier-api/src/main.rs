//! Courier CLI, REST API and Telegram bot entry point.
//!
//! Binary name: `courier`
//!
//! Loads `.env`, parses CLI arguments, resolves configuration, then starts
//! the REST API server, the bot, or runs an operator command.

mod bot;
mod cli;
mod http;
mod state;

use std::path::Path;

use anyhow::Context;
use clap::Parser;
use console::style;
use secrecy::SecretString;
use tokio_util::sync::CancellationToken;

use courier_core::bot::dialogue::Dialogue;
use courier_core::bot::session::MemorySessionStore;
use courier_infra::client::HttpMessageApi;
use courier_infra::config::{load_config, resolve_data_dir};
use courier_infra::telegram::TelegramClient;
use courier_observe::tracing_setup::{filter_for_verbosity, init_tracing, shutdown_tracing};
use courier_types::config::CourierConfig;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env must be loaded before clap reads env fallbacks.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_tracing(filter_for_verbosity(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let data_dir = resolve_data_dir();
    let mut config = load_config(&data_dir).await;
    cli.overrides.apply(&mut config);

    let result = run(cli.command, config, &data_dir, cli.json).await;
    shutdown_tracing();
    result
}

async fn run(
    command: Commands,
    config: CourierConfig,
    data_dir: &Path,
    json: bool,
) -> anyhow::Result<()> {
    match command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or(config.host.clone());
            let port = port.unwrap_or(config.port);
            let state = AppState::init(&config, data_dir).await?;
            if !state.message_service.cache().is_shared() {
                tracing::warn!(
                    "Snapshot cache is private to this server; other processes must write through its API"
                );
            }

            let router = http::router::build_router(state.clone());
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;

            println!();
            println!(
                "  {} Courier API listening on {}",
                style("▸").green().bold(),
                style(format!("http://{addr}")).cyan(),
            );
            println!("  {}", style("Press Ctrl+C to stop").dim());
            println!();

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            state.shutdown().await;
            println!("\n  Server stopped.");
        }

        Commands::Bot { token } => {
            let api_url = config.api_url;
            let api = HttpMessageApi::new(api_url.as_str())?;
            let telegram = TelegramClient::new(SecretString::from(token))?;
            let dialogue = Dialogue::new(api, MemorySessionStore::new());

            let cancel = CancellationToken::new();
            let on_signal = cancel.clone();
            tokio::spawn(async move {
                shutdown_signal().await;
                on_signal.cancel();
            });

            tracing::info!(api_url = %api_url, "Starting Telegram bot");
            bot::run_bot(&telegram, &dialogue, cancel).await?;
        }

        Commands::Messages { action } => {
            let state = AppState::init(&config, data_dir).await?;
            let result =
                cli::message::handle_messages_command(action, &state, &config.api_url, json)
                    .await;
            state.shutdown().await;
            result?;
        }
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

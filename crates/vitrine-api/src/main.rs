//! Vitrine CLI and session hub entry point.
//!
//! Binary name: `vitrine`
//!
//! Parses CLI arguments, loads configuration, then either starts the HTTP/WS
//! server or emits shell completions.

mod config;
mod http;
mod state;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use clap_complete::generate;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use vitrine_core::session::registry::spawn_idle_sweeper;
use vitrine_types::config::ServerConfig;

use state::AppState;

/// Session hub for the Vitrine interactive demo.
#[derive(Debug, Parser)]
#[command(name = "vitrine", version, about)]
struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Start the HTTP/WS server
    Serve {
        /// Bind address, overriding the config file
        #[arg(long)]
        bind: Option<String>,

        /// Path to a TOML config file (default: ./vitrine.toml)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "info,vitrine=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            generate(shell, &mut cmd, "vitrine", &mut std::io::stdout());
            Ok(())
        }
        Commands::Serve { bind, config } => {
            let mut cfg = config::load_config(config.as_deref()).await;
            if let Some(bind) = bind {
                cfg.bind_addr = bind;
            }
            serve(cfg).await
        }
    }
}

/// Run the server until ctrl-c.
async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let state = AppState::new(config);
    let shutdown = CancellationToken::new();

    let sweeper = spawn_idle_sweeper(
        Arc::clone(&state.registry),
        Duration::from_secs(state.config.idle_timeout_secs),
        Duration::from_secs(state.config.sweep_interval_secs),
        shutdown.clone(),
    );

    let bind_addr = state.config.bind_addr.clone();
    let router = http::router::build_router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "vitrine session hub listening");

    // ctrl-c triggers graceful shutdown of both the server and the sweeper
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown requested");
            trigger.cancel();
        }
    });

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown.clone().cancelled_owned())
        .await?;

    shutdown.cancel();
    sweeper.await?;
    Ok(())
}

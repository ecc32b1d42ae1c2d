//! # Playmark Server
//!
//! Viewing-progress and playback-resume service.
//!
//! - **Resume**: `GET /api/contents/{id}/stream` returns the streaming URL
//!   and the caller's last position
//! - **Progress**: heartbeat and final-position writes, last-write-wins
//! - **History**: continue-watching and full viewing history per user
//!
//! Storage is PostgreSQL in production or an in-memory map in dev mode.

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use playmark_config::{ConfigLoad, ConfigLoader, ConfigLoaderOptions};
use playmark_core::database::PostgresDatabase;
use playmark_server::{infra::startup::build_app_state, routes::build_router};
use std::{net::SocketAddr, path::PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "playmark-server")]
#[command(about = "Viewing-progress and playback-resume server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Path to a playmark.toml configuration file
    #[arg(short, long, env = "PLAYMARK_CONFIG")]
    config: Option<PathBuf>,

    /// Path to a .env file (defaults to ./.env)
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Server port (overrides config)
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommand,
    },
}

#[derive(Subcommand, Debug)]
enum DbCommand {
    /// Apply pending migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let load = load_runtime_config(&cli.serve)?;

    match cli.command {
        Some(Command::Db {
            command: DbCommand::Migrate,
        }) => run_migrations(load).await,
        None => serve(load).await,
    }
}

fn load_runtime_config(args: &ServeArgs) -> anyhow::Result<ConfigLoad> {
    let options = ConfigLoaderOptions {
        config_path: args.config.clone(),
        env_file: args.env_file.clone(),
    };
    let ConfigLoad {
        mut config,
        warnings,
    } = ConfigLoader::with_options(options)
        .load()
        .context("failed to load configuration")?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host.clone() {
        config.server.host = host;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = config.metadata.config_path.as_ref() {
        info!(path = %path.display(), "loaded configuration file");
    }

    for warning in warnings.iter() {
        match &warning.hint {
            Some(hint) => {
                warn!(message = %warning.message, hint = %hint, "configuration warning")
            }
            None => {
                warn!(message = %warning.message, "configuration warning")
            }
        }
    }

    Ok(ConfigLoad { config, warnings })
}

async fn run_migrations(load: ConfigLoad) -> anyhow::Result<()> {
    let config = load.config;
    let url = config
        .database
        .url
        .as_deref()
        .context("DATABASE_URL must be set to run migrations")?;

    let db = PostgresDatabase::connect(url, config.database.max_connections)
        .await
        .context("failed to connect to Postgres")?;
    db.migrate().await.context("failed to apply migrations")?;

    info!("migrations complete");
    Ok(())
}

async fn serve(load: ConfigLoad) -> anyhow::Result<()> {
    let bind_address = load.config.bind_address();
    let storage = load.config.storage;
    let dev_mode = load.config.dev_mode;

    let state = build_app_state(load.config)
        .await
        .context("failed to initialize application state")?;
    let router = build_router(state);

    let addr: SocketAddr = bind_address
        .parse()
        .with_context(|| format!("invalid bind address {bind_address}"))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(%addr, %storage, dev_mode, "Playmark server listening");

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

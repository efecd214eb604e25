// Zoo & Bear Records API - Web Server

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use zoo_api::{create_router, AppState, Config, ResourceKind, Store};

/// JSON CRUD API for zoo and bear records.
#[derive(Parser, Debug)]
#[command(name = "zoo-server")]
#[command(version)]
struct Args {
    /// Enable debug logging for the API and HTTP layers.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Port to listen on (overrides ZOO_API_PORT).
    #[arg(short, long, global = true)]
    port: Option<u16>,

    /// SQLite database file (overrides ZOO_API_DATABASE_PATH).
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Serve the API (default).
    Serve,

    /// Load and validate configuration, open the database, then exit.
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load().context("failed to load configuration")?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(database) = args.database.clone() {
        config.database_path = database;
    }

    init_logging(&config, args.verbose);
    config.validate()?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::CheckConfig => check_config(&config),
    }
}

fn init_logging(config: &Config, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("zoo_api=debug,tower_http=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

async fn serve(config: Config) -> Result<()> {
    let store = Store::open(&config.database_path).with_context(|| {
        format!("failed to open database at {}", config.database_path.display())
    })?;

    let state = AppState::new(store.clone()).with_redaction(config.redact_store_errors);
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    println!("\n=== Web API Listening on http://localhost:{} ===\n", config.port);
    info!(%addr, version = zoo_api::VERSION, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    store.close().context("failed to close database")?;
    Ok(())
}

fn check_config(config: &Config) -> Result<()> {
    println!("Configuration OK");
    println!("  port:                {}", config.port);
    println!("  database:            {}", config.database_path.display());
    println!("  log level:           {}", config.log_level);
    println!("  redact store errors: {}", config.redact_store_errors);

    let store = Store::open(&config.database_path).with_context(|| {
        format!("failed to open database at {}", config.database_path.display())
    })?;
    for kind in ResourceKind::ALL {
        println!("  {:<20} {} records", format!("{kind}:"), store.count(kind)?);
    }
    store.close()?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
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
                tracing::error!(error = %e, "failed to listen for SIGTERM");
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

    info!("shutdown signal received");
}

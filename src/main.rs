//! Main entry point for the Beat Battle ELO service
//!
//! Loads configuration, optionally seeds the roster from a CSV file, and
//! serves the leaderboard and admin endpoints until a shutdown signal.

use anyhow::{Context, Result};
use beat_battle_elo::config::AppConfig;
use beat_battle_elo::service::{create_router, AppState};
use beat_battle_elo::session::EloSession;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

/// Beat Battle ELO - leaderboard and rating tracker for beat battles
#[derive(Parser)]
#[command(
    name = "beat-battle-elo",
    version,
    about = "Rating tracker and leaderboard for beat battle competitions",
    long_about = "Beat Battle ELO keeps a roster of producers, applies per-battle grades and \
                 rank decay, places every rating into a named tier, and serves a public \
                 leaderboard alongside password-protected admin endpoints."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// HTTP port override
    #[arg(long, value_name = "PORT", help = "Override HTTP server port")]
    http_port: Option<u16>,

    /// Roster to load at startup
    #[arg(long, value_name = "FILE", help = "Import a CSV roster before serving")]
    seed_csv: Option<PathBuf>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Dry run mode (validate config and exit)
    #[arg(
        long,
        help = "Validate configuration and exit without starting service"
    )]
    dry_run: bool,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C) signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}

/// Display startup banner with service information
fn display_startup_banner(config: &AppConfig) {
    info!("🎛️  Beat Battle ELO Service");
    info!("   Service: {}", config.service.name);
    info!("   Season: {}", config.service.season_title);
    info!("   Log level: {}", config.service.log_level);
    info!("   HTTP: {}", config.bind_address());
    info!(
        "   Default rating: {} ({} placements)",
        config.rating.default_rating, config.rating.default_placements
    );
    info!(
        "   Decay: -{} per battle, capped at {} misses",
        config.rating.decay_amount, config.rating.decay_cap
    );
    info!("   Tiers: {}", config.rating.tiers.len());
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}

/// Load and merge configuration from environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    // Apply CLI overrides
    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    if let Some(http_port) = args.http_port {
        config.service.http_port = http_port;
    }

    beat_battle_elo::config::validate_config(&config)?;
    Ok(config)
}

/// Build the session, importing the seed roster when one is given
fn load_session(config: &AppConfig, seed_csv: Option<&PathBuf>) -> Result<EloSession> {
    let mut session = EloSession::with_config(config.rating.clone())?;

    if let Some(path) = seed_csv {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open seed roster {}", path.display()))?;
        let imported = session
            .import_csv(file)
            .with_context(|| format!("Failed to import seed roster {}", path.display()))?;
        info!("Seeded {} participants from {}", imported, path.display());
    }

    Ok(session)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration (CLI args can override environment/config file)
    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {:#}", e);
        std::process::exit(1);
    });

    // Initialize logging early (before any other operations)
    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let session = match load_session(&config, args.seed_csv.as_ref()) {
        Ok(session) => session,
        Err(e) => {
            error!("Failed to load roster: {:#}", e);
            std::process::exit(1);
        }
    };

    if args.dry_run {
        info!("Configuration validation successful");
        display_startup_banner(&config);
        info!("Dry run completed - exiting without starting service");
        return Ok(());
    }

    // Display startup information
    display_startup_banner(&config);

    info!("Initializing service components...");
    let app_state = match AppState::with_session(config.clone(), session) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind HTTP server to {}", bind_address))?;

    info!("✅ Beat Battle ELO Service is listening on {}", bind_address);
    info!("Press Ctrl+C to shutdown gracefully...");

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let router = create_router(app_state);
    let mut server = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
    });

    tokio::select! {
        _ = wait_for_shutdown_signal() => {},
        result = &mut server => {
            error!("HTTP server exited unexpectedly: {:?}", result);
            std::process::exit(1);
        }
    }

    // Begin graceful shutdown
    info!("🛑 Shutdown signal received, beginning graceful shutdown...");
    let _ = shutdown_tx.send(());

    match tokio::time::timeout(config.shutdown_timeout(), server).await {
        Ok(Ok(Ok(()))) => info!("✅ Graceful shutdown completed successfully"),
        Ok(Ok(Err(e))) => error!("HTTP server error during shutdown: {}", e),
        Ok(Err(e)) => error!("HTTP server task failed: {}", e),
        Err(_) => warn!("⚠️  Shutdown timeout exceeded, forcing exit"),
    }

    info!("🛑 Beat Battle ELO Service stopped");
    Ok(())
}

//! Headless API server entrypoint.

use snipstore_server::{config::Config, db::Database, serve_router, AppState, DEFAULT_PORT};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct CliFlags {
    help: bool,
}

fn parse_cli_flags(args: &[String]) -> anyhow::Result<CliFlags> {
    let mut flags = CliFlags::default();
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => flags.help = true,
            value if value.starts_with('-') => {
                anyhow::bail!(
                    "Unknown option: '{}'. Use --help to see supported options.",
                    value
                );
            }
            value => {
                anyhow::bail!(
                    "Unexpected positional argument: '{}'. Use --help to see supported options.",
                    value
                );
            }
        }
    }
    Ok(flags)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snipstore=info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    if parse_cli_flags(&args)?.help {
        print_help();
        return Ok(());
    }

    let config = Config::from_env();
    let database = Database::new(&config.db_path)?;
    let state = AppState::new(config.clone(), database)?;

    if config.allow_public_access {
        tracing::warn!("Public access enabled - server will accept requests from any origin");
    }

    let bind_addr = snipstore_server::resolve_bind_address(&config);
    if !bind_addr.ip().is_loopback() {
        tracing::warn!(
            "Binding to non-localhost address: {} - ensure proper security measures are in place",
            bind_addr
        );
    }

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let actual_addr = listener.local_addr().unwrap_or(bind_addr);
    tracing::info!(
        id_length = state.handler.config().id_length,
        max_id_attempts = ?state.handler.config().max_attempts,
        "snipstore running at http://{}",
        actual_addr
    );

    serve_router(listener, state, shutdown_signal()).await?;
    tracing::info!("snipstore stopped");
    Ok(())
}

fn print_help() {
    println!("snipstore server\n");
    println!("Usage: snipstore [OPTIONS]\n");
    println!("Options:");
    println!("  -h, --help          Show this help message");
    println!("\nEnvironment variables:");
    println!("  DB_PATH             Database directory (default: ~/.cache/snipstore/db)");
    println!("  PORT                Server port (default: {})", DEFAULT_PORT);
    println!("  BIND                Override bind address (e.g. 0.0.0.0:{})", DEFAULT_PORT);
    println!("  MAX_DOCUMENT_SIZE   Maximum document size in bytes (default: 400000)");
    println!("  ID_LENGTH           Characters per document id (default: 12)");
    println!("  MAX_ID_ATTEMPTS     Id allocation attempts, 0 for unbounded (default: 16)");
    println!("  ALLOW_PUBLIC_ACCESS Allow CORS from any origin and non-loopback binds");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
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
    tracing::info!("Shutdown signal received");
}

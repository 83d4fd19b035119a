use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sat_api::config::AppConfig;
use sat_api::database::{DatabaseManager, InMemoryStore, PgStore, Store};
use sat_api::{app, AppState};

#[derive(Parser, Debug)]
#[command(name = "sat-api", version, about = "SAT meetup REST API server")]
struct Args {
    /// Interface to bind, overrides SAT_API_HOST
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on, overrides SAT_API_PORT / PORT
    #[arg(short, long)]
    port: Option<u16>,

    /// Keep all data in memory even when DATABASE_URL is set
    #[arg(long, env = "SAT_API_IN_MEMORY")]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let mut config = AppConfig::from_env();
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    init_tracing(&config);
    tracing::info!("Starting SAT API in {:?} mode", config.environment);

    let store: Arc<dyn Store> = match (&config.database.url, args.in_memory) {
        (Some(_), false) => {
            let pool = DatabaseManager::connect(&config.database).await?;
            DatabaseManager::ensure_schema(&pool).await?;
            Arc::new(PgStore::new(pool))
        }
        _ => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Arc::new(InMemoryStore::new())
        }
    };

    let bind_addr = config.bind_addr();
    let state = AppState::new(config, store)?;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("SAT API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let default_filter = if config.api.enable_request_logging {
        "sat_api=info,tower_http=debug"
    } else {
        "sat_api=info,tower_http=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

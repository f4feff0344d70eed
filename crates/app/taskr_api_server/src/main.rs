//! taskr API server binary.
//!
//! Prints `{"port": N}` to stdout once bound so callers using an ephemeral
//! port can discover it. Logs go to stderr.

use std::sync::Arc;

use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use taskr_api::AppState;
use taskr_api::config::ApiConfig;
use taskr_core::auth::refresh::InMemoryRefreshTokenStore;
use taskr_core::store::postgres::PgStore;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "taskr_api_server", about = "taskr API server")]
struct Args {
    /// Interface to bind. Overrides the host part of `BIND_ADDR`.
    #[arg(long, env = "HOST")]
    host: Option<String>,

    /// Port to listen on (0 = ephemeral). Overrides the port part of `BIND_ADDR`.
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// PostgreSQL connection URL. Without one, users and tasks live in memory.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Write logs to stderr so stdout is reserved for the JSON port message.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,taskr_api=debug,taskr_core=debug,tower_http=debug")),
        )
        .init();

    let args = Args::parse();

    // Signing secret, algorithm, ttl and the default bind address come from
    // the environment; flags override the address and database URL.
    let env_config = ApiConfig::from_env()?;
    let config = ApiConfig {
        bind_addr: bind_addr(args.host.as_deref(), args.port, &env_config.bind_addr),
        database_url: args.database_url.filter(|u| !u.is_empty()),
        ..env_config
    };

    info!(
        bind_addr = %config.bind_addr,
        algorithm = ?config.jwt_algorithm,
        access_token_ttl_minutes = config.access_token_ttl_minutes,
        "starting taskr_api_server"
    );

    let state = match config.database_url.clone() {
        Some(url) => {
            info!(max_connections = args.max_connections, "connecting to PostgreSQL");
            let pool = PgPoolOptions::new()
                .max_connections(args.max_connections)
                .acquire_timeout(std::time::Duration::from_secs(30))
                .connect(&url)
                .await?;

            info!("running database migrations");
            taskr_core::migrate::migrate(&pool).await?;

            let store = Arc::new(PgStore::new(pool));
            AppState::new(
                config.clone(),
                store.clone(),
                Arc::new(InMemoryRefreshTokenStore::new()),
                store,
            )?
        }
        None => {
            warn!("no DATABASE_URL configured, users and tasks are kept in memory");
            AppState::in_memory(config.clone())?
        }
    };

    let app = taskr_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;

    println!("{}", serde_json::json!({"port": local_addr.port()}));
    info!(addr = %local_addr, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

/// Apply `--host`/`--port` over the configured `host:port`.
fn bind_addr(host: Option<&str>, port: Option<u16>, configured: &str) -> String {
    let (conf_host, conf_port) = configured.rsplit_once(':').unwrap_or((configured, ""));
    let host = host.unwrap_or(conf_host);
    match port {
        Some(port) => format!("{host}:{port}"),
        None => format!("{host}:{conf_port}"),
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}

//! Hearth API server binary.

use std::sync::Arc;

use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use hearth_core::store::{LoggingResetNotifier, postgres::PgIdentityStore};

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "hearth_api_server", about = "Hearth API server")]
struct Args {
    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,hearth_api=debug,hearth_core=debug".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    // Misconfiguration (e.g. a missing signing secret) is fatal here, before
    // any request is accepted.
    let config = hearth_api::config::ApiConfig::from_env()?;

    info!(
        database_url = %config.pg_connection_url,
        bind_addr = %config.bind_addr,
        max_connections = args.max_connections,
        "starting hearth_api_server"
    );

    let pool = PgPoolOptions::new()
        .max_connections(args.max_connections)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&config.pg_connection_url)
        .await?;

    info!("running database migrations");
    hearth_core::migrate::migrate(&pool).await?;

    let state = hearth_api::AppState::new(
        Arc::new(PgIdentityStore::new(pool)),
        Arc::new(LoggingResetNotifier),
        config.clone(),
    );

    let app = hearth_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "REST API listening");

    axum::serve(listener, app).await?;

    Ok(())
}

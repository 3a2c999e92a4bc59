use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tower::make::Shared;
use tracing_subscriber::EnvFilter;

use jobdesk::auth::jwt::JwtService;
use jobdesk::config::AppConfig;
use jobdesk::db;
use jobdesk::routes::create_router;
use jobdesk::state::AppState;
use jobdesk::store::PgStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    tracing::info!(
        component = "api",
        database_url = %config.redacted_database_url(),
        pool_size = config.database_max_pool_size,
        server_host = %config.server_host,
        server_port = config.server_port,
        duplicate_policy = ?config.duplicate_policy,
        cors_restricted = config.cors_allowed_origin.is_some(),
        "loaded configuration"
    );

    let pool = db::init_pool_with_size(&config.database_url, config.database_max_pool_size)?;
    let migration_pool = pool.clone();
    tokio::task::spawn_blocking(move || db::run_migrations(&migration_pool))
        .await
        .context("migration task panicked")??;
    tracing::info!("database migrations applied");

    let store = Arc::new(PgStore::new(pool));
    let jwt = JwtService::from_config(&config);
    let listen_addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port)
        .parse()
        .context("SERVER_HOST and PORT must form a socket address")?;

    let state = AppState::new(config, store, jwt);
    let router = create_router(state);

    let listener = TcpListener::bind(listen_addr).await?;
    tracing::info!("listening on {}", listen_addr);

    axum::serve(listener, Shared::new(router)).await?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use barbershop::config::AppConfig;
use barbershop::db::SqliteStore;
use barbershop::routes;
use barbershop::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let store = SqliteStore::open(&config.database_url)?;
    tracing::info!("opened database at {}", config.database_url);

    let state = Arc::new(AppState::new(config.clone(), Arc::new(store)));
    let app = routes::app(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

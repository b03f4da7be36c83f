use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use edugate::edugate_config::AppConfig;
use edugate::edugate_db::{PgStore, init_db_pool, run_migrations};
use edugate::logging::init_tracing;
use edugate::router::init_router;
use edugate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env().context("invalid configuration")?;

    let pool = init_db_pool(&config.database)
        .await
        .context("failed to connect to database")?;
    run_migrations(&pool)
        .await
        .context("failed to run migrations")?;

    let state = AppState::new(&config, Arc::new(PgStore::new(pool)));
    let app = init_router(state)?;

    let address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

    tracing::info!(%address, "server listening");
    tracing::info!("Swagger UI available at http://{address}/swagger-ui");
    axum::serve(listener, app).await?;

    Ok(())
}

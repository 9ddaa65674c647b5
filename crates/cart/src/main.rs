use anyhow::{Context, Result};
use cart::{config::myconfig::Config, handler::AppRouter, state::AppState};
use shared::{
    config::{ConnectionManager, ConnectionPool},
    utils::{Telemetry, init_logger},
};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let config = Config::init().context("Failed to load configuration")?;

    let telemetry = Telemetry::new("cart-service", config.otel_endpoint.clone());
    let providers = telemetry
        .init()
        .context("Failed to initialize telemetry")?;

    init_logger(
        providers.logger.clone(),
        "cart-service",
        config.is_dev,
        config.enable_file_log,
    );

    let db_pool = ConnectionManager::new_pool(
        &config.database_url,
        config.db_min_conn,
        config.db_max_conn,
    )
    .await
    .context("Failed to initialize database pool")?;

    if config.run_migrations {
        run_migrations(&db_pool)
            .await
            .context("Failed to migrate database")?;
    }

    let state = AppState::new(db_pool, &config)
        .await
        .context("Failed to create AppState")?;

    info!("✅ Application setup completed successfully.");

    let served = AppRouter::serve(config.port, state).await;

    info!("🛑 Shutting down cart service...");

    if let Err(e) = providers.shutdown() {
        error!("Failed to shutdown telemetry: {e}");
    }

    served
}

async fn run_migrations(pool: &ConnectionPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;

    info!("✅ Database migrations applied");

    Ok(())
}

use msm_nr1::config::{AppConfig, RunMode};
use msm_nr1::state::{AppState, SharedState};
use msm_nr1::{db, web};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = db::connect(&config.database_url, config.db_max_connections)
        .await
        .map_err(|e| {
            tracing::error!("Failed to connect to database: {}", e);
            e
        })?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations...");
    db::migrate(&pool).await.map_err(|e| {
        tracing::error!("Failed to run database migrations: {}", e);
        e
    })?;
    tracing::info!("Database migrations completed");

    match config.mode {
        RunMode::Production => {
            tracing::info!("Production mode: serving frontend from {}", config.static_dir.display())
        }
        RunMode::Development => {
            tracing::info!("Development mode: API only, start the frontend dev server separately")
        }
    }

    let bind_addr = config.bind_addr.clone();
    let shared: SharedState = Arc::new(AppState {
        pool,
        config: Arc::new(config),
    });

    let app = web::app(shared);

    tracing::info!("Listening on {bind_addr}");
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

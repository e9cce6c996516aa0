use std::net::SocketAddr;
use std::sync::Arc;

mod app;
mod auth;
mod chat;
mod config;
mod error;
mod history;
mod middleware;
mod notifications;
mod predict;
mod state;
mod store;
mod validate;
mod weather;

use crate::config::AppConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "agripredict=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = Arc::new(AppConfig::from_env()?);
    tracing::debug!(environment = ?config.environment, "configuration loaded");

    let state = if config.database_url.is_some() {
        let (state, pool) = AppState::with_postgres(config.clone()).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        state
    } else {
        tracing::warn!("DATABASE_URL not set; using in-memory stores (demo mode)");
        AppState::in_memory(config.clone())
    };

    state
        .stores
        .notifications
        .seed(notifications::default_notifications())
        .await
        .map_err(anyhow::Error::from)?;

    let app = app::build_app(state);

    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    // Connect info feeds the per-IP rate limiter.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

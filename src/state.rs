use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::AppConfig;
use crate::store::Stores;

#[derive(Clone)]
pub struct AppState {
    pub stores: Stores,
    pub config: Arc<AppConfig>,
    pub started_at: Instant,
}

impl AppState {
    /// Connect to Postgres and build the production state.
    pub async fn with_postgres(config: Arc<AppConfig>) -> anyhow::Result<(Self, PgPool)> {
        let url = config
            .database_url
            .as_deref()
            .context("DATABASE_URL not set")?;
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(url)
            .await
            .context("connect to database")?;
        let state = Self {
            stores: Stores::postgres(pool.clone()),
            config,
            started_at: Instant::now(),
        };
        Ok((state, pool))
    }

    /// State backed by in-memory stores; used by tests and demo mode.
    pub fn in_memory(config: Arc<AppConfig>) -> Self {
        Self {
            stores: Stores::in_memory(),
            config,
            started_at: Instant::now(),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

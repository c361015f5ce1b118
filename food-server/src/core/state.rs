//! Server state shared by every handler

use sqlx::SqlitePool;

use crate::cache::ResponseCache;
use crate::core::Config;
use crate::db::DbService;
use crate::utils::AppResult;

/// Server state, cloned into each request through axum `State`
///
/// | Field | Meaning |
/// |-------|---------|
/// | config | loaded configuration |
/// | db | SQLite pool with migrations applied |
/// | cache | response cache (no-op when disabled) |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub cache: ResponseCache,
}

impl ServerState {
    pub fn new(config: Config, db: DbService, cache: ResponseCache) -> Self {
        Self { config, db, cache }
    }

    /// Open the database and build the cache from `config`
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let db = DbService::new(&config.database_url, config.db_max_connections).await?;
        let cache = ResponseCache::new(config.cache_enabled);
        tracing::info!(
            environment = %config.environment,
            cache_enabled = config.cache_enabled,
            "Server state initialized"
        );
        Ok(Self::new(config.clone(), db, cache))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }

    /// Release resources held by the state
    pub async fn shutdown(&self) {
        self.db.close().await;
    }
}

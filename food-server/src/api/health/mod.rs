//! Health check
//!
//! ```json
//! {
//!   "status": "ok",
//!   "service": "food-server",
//!   "version": "0.1.0",
//!   "database": "ok",
//!   "cache_enabled": true
//! }
//! ```

use axum::{Router, extract::State, routing::get};
use serde::Serialize;

use crate::api::extract::Json;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// ok | degraded
    status: &'static str,
    service: &'static str,
    version: &'static str,
    /// ok | error
    database: &'static str,
    cache_enabled: bool,
}

/// GET /health
async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let database = match sqlx::query("SELECT 1").execute(state.pool()).await {
        Ok(_) => "ok",
        Err(e) => {
            tracing::error!("Health check database probe failed: {e}");
            "error"
        }
    };
    Json(HealthResponse {
        status: if database == "ok" { "ok" } else { "degraded" },
        service: "food-server",
        version: env!("CARGO_PKG_VERSION"),
        database,
        cache_enabled: state.cache.is_enabled(),
    })
}

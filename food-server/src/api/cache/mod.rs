//! Cache administration
//!
//! | Path | Method | Meaning |
//! |------|--------|---------|
//! | /cache/stats | GET | key counts, hit/miss counters and TTLs |
//! | /cache/clear | DELETE | drop every cached entry |
//! | /cache/clear/{namespace} | DELETE | drop one namespace |

use axum::{
    Router,
    extract::State,
    routing::{delete, get},
};
use serde::Serialize;

use crate::api::extract::{Json, Path};
use crate::cache::{CacheStats, ResponseCache, ns};
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/cache/stats", get(stats))
        .route("/cache/clear", delete(clear_all))
        .route("/cache/clear/{namespace}", delete(clear_namespace))
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    status: &'static str,
    data: CacheStats,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    status: &'static str,
    message: String,
    deleted_keys: usize,
}

/// GET /cache/stats
async fn stats(State(state): State<ServerState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        status: "success",
        data: state.cache.stats(),
    })
}

/// DELETE /cache/clear
async fn clear_all(State(state): State<ServerState>) -> Json<ClearResponse> {
    let deleted_keys = state.cache.clear_all();
    tracing::info!(deleted_keys, "Cache cleared");
    Json(ClearResponse {
        status: "success",
        message: "Successfully cleared entire cache".to_string(),
        deleted_keys,
    })
}

/// DELETE /cache/clear/{namespace}
async fn clear_namespace(
    State(state): State<ServerState>,
    Path(namespace): Path<String>,
) -> AppResult<Json<ClearResponse>> {
    if !ResponseCache::is_namespace(&namespace) {
        return Err(AppError::invalid_request(format!(
            "Invalid namespace. Available namespaces: {}",
            ns::ALL.join(", ")
        ))
        .with_detail("available", ns::ALL.to_vec()));
    }
    let deleted_keys = state.cache.clear_namespace(&namespace);
    tracing::info!(namespace = %namespace, deleted_keys, "Cache namespace cleared");
    Ok(Json(ClearResponse {
        status: "success",
        message: format!("Successfully cleared {namespace} cache namespace"),
        deleted_keys,
    }))
}

//! Analytics API

use axum::{Router, extract::State, routing::get};
use shared::models::{CustomerAnalytics, RestaurantAnalytics};

use crate::api::extract::{Json, Path};
use crate::core::ServerState;
use crate::services::analytics_service;
use crate::utils::AppResult;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/analytics/restaurants/{id}", get(restaurant))
        .route("/analytics/customers/{id}", get(customer))
}

/// GET /analytics/restaurants/{id} - revenue, ratings and popular items
async fn restaurant(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<RestaurantAnalytics>> {
    Ok(Json(
        analytics_service::restaurant_analytics(state.pool(), id).await?,
    ))
}

/// GET /analytics/customers/{id} - spending and favourites
async fn customer(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<CustomerAnalytics>> {
    Ok(Json(
        analytics_service::customer_analytics(state.pool(), id).await?,
    ))
}

//! Review API Handlers

use axum::extract::State;
use http::StatusCode;
use serde::Deserialize;
use shared::models::{Review, ReviewCreate};

use crate::api::extract::{Json, Path, Query};
use crate::cache::ns;
use crate::core::ServerState;
use crate::services::review_service;
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct ReviewerQuery {
    pub customer_id: i64,
}

/// POST /orders/{id}/review?customer_id= - review a delivered order
pub async fn create(
    State(state): State<ServerState>,
    Path(order_id): Path<i64>,
    Query(query): Query<ReviewerQuery>,
    Json(payload): Json<ReviewCreate>,
) -> AppResult<(StatusCode, Json<Review>)> {
    let review =
        review_service::create_review(state.pool(), order_id, query.customer_id, &payload).await?;
    state.cache.invalidate(&[ns::REVIEWS, ns::RESTAURANTS]);
    Ok((StatusCode::CREATED, Json(review)))
}

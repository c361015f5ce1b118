//! Order API Handlers

use axum::extract::State;
use serde::Deserialize;
use shared::models::{Order, OrderDetail, OrderStatus, OrderUpdate};

use crate::api::extract::{Json, Path, Query};
use crate::api::pagination::{self, RECORD_MAX_LIMIT};
use crate::cache::ns;
use crate::core::ServerState;
use crate::db::repository::order::OrderFilter;
use crate::services::order_service;
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub customer_id: Option<i64>,
    pub restaurant_id: Option<i64>,
    pub status: Option<OrderStatus>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

/// GET /orders - list orders, newest first
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let page = pagination::page(query.skip, query.limit, RECORD_MAX_LIMIT)?;
    let filter = OrderFilter {
        customer_id: query.customer_id,
        restaurant_id: query.restaurant_id,
        status: query.status,
    };
    let orders = order_service::list_orders(state.pool(), &filter, page).await?;
    Ok(Json(orders))
}

/// GET /orders/{id} - order with customer, restaurant and lines
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderDetail>> {
    let detail = order_service::get_order_detail(state.pool(), id).await?;
    Ok(Json(detail))
}

/// PUT /orders/{id}/status - advance the status and/or edit delivery data
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderUpdate>,
) -> AppResult<Json<Order>> {
    let order = order_service::update_order(state.pool(), id, &payload).await?;
    state.cache.invalidate(&[ns::ORDERS, ns::RESTAURANTS]);
    Ok(Json(order))
}

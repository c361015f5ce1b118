//! Customer API Handlers

use axum::extract::State;
use http::StatusCode;
use serde::Deserialize;
use shared::models::{
    Customer, CustomerAnalytics, CustomerCreate, CustomerUpdate, Order, OrderCreate, OrderStatus,
    PlacedOrder, Restaurant, Review,
};

use crate::api::extract::{Json, Path, Query};
use crate::api::pagination::{self, PageQuery, RECORD_MAX_LIMIT};
use crate::cache::ns;
use crate::core::ServerState;
use crate::db::repository::order::OrderFilter;
use crate::services::{analytics_service, customer_service, order_service, review_service};
use crate::utils::{ApiResponse, AppResult};

#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
    pub status: Option<OrderStatus>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationsQuery {
    pub limit: Option<i64>,
}

/// GET /customers - list customers
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Vec<Customer>>> {
    let page = query.page(RECORD_MAX_LIMIT)?;
    let customers = customer_service::list_customers(state.pool(), page).await?;
    Ok(Json(customers))
}

/// GET /customers/{id} - get a customer
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Customer>> {
    let customer = customer_service::get_customer(state.pool(), id).await?;
    Ok(Json(customer))
}

/// POST /customers - register a customer
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CustomerCreate>,
) -> AppResult<(StatusCode, Json<Customer>)> {
    let customer = customer_service::create_customer(state.pool(), &payload).await?;
    state.cache.invalidate(&[ns::CUSTOMERS]);
    Ok((StatusCode::CREATED, Json(customer)))
}

/// PUT /customers/{id} - partially update a customer
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CustomerUpdate>,
) -> AppResult<Json<Customer>> {
    let customer = customer_service::update_customer(state.pool(), id, &payload).await?;
    state.cache.invalidate(&[ns::CUSTOMERS]);
    Ok(Json(customer))
}

/// DELETE /customers/{id} - delete a customer with their orders and reviews
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse> {
    customer_service::delete_customer(state.pool(), id).await?;
    state
        .cache
        .invalidate(&[ns::CUSTOMERS, ns::ORDERS, ns::REVIEWS, ns::RESTAURANTS]);
    Ok(ApiResponse::ok_with_message("Customer deleted successfully"))
}

/// GET /customers/{id}/orders - order history of a customer
pub async fn orders(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(query): Query<OrdersQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let page = pagination::page(query.skip, query.limit, RECORD_MAX_LIMIT)?;
    let filter = OrderFilter {
        customer_id: Some(id),
        status: query.status,
        ..Default::default()
    };
    let orders = order_service::list_orders(state.pool(), &filter, page).await?;
    Ok(Json(orders))
}

/// POST /customers/{id}/orders - place an order
pub async fn place_order(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<(StatusCode, Json<PlacedOrder>)> {
    let placed = order_service::place_order(state.pool(), id, &payload).await?;
    state.cache.invalidate(&[ns::ORDERS, ns::RESTAURANTS]);
    Ok((StatusCode::CREATED, Json(placed)))
}

/// GET /customers/{id}/reviews - reviews written by a customer
pub async fn reviews(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Vec<Review>>> {
    let page = query.page(RECORD_MAX_LIMIT)?;
    let reviews = review_service::list_for_customer(state.pool(), id, page).await?;
    Ok(Json(reviews))
}

/// GET /customers/{id}/analytics - spending and favourites
pub async fn analytics(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<CustomerAnalytics>> {
    let analytics = analytics_service::customer_analytics(state.pool(), id).await?;
    Ok(Json(analytics))
}

/// GET /customers/{id}/recommendations - restaurants to try next
pub async fn recommendations(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(query): Query<RecommendationsQuery>,
) -> AppResult<Json<Vec<Restaurant>>> {
    let limit = pagination::bounded(query.limit, "limit", 10, 1, 50)?;
    let restaurants = customer_service::recommendations(state.pool(), id, limit).await?;
    Ok(Json(restaurants))
}

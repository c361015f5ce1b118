//! Restaurant API Handlers

use axum::extract::State;
use http::StatusCode;
use serde::Deserialize;
use shared::models::{
    MenuItem, MenuItemCreate, Order, OrderStatus, Restaurant, RestaurantAnalytics,
    RestaurantCreate, RestaurantUpdate, RestaurantWithMenu, Review, TrendingRestaurant,
};

use crate::api::extract::{Json, Path, Query};
use crate::api::pagination::{self, CATALOG_MAX_LIMIT, PageQuery, RECORD_MAX_LIMIT};
use crate::cache::{CacheTtl, ns};
use crate::core::ServerState;
use crate::db::repository::order::OrderFilter;
use crate::db::repository::restaurant::RestaurantSearch;
use crate::services::{analytics_service, catalog_service, order_service, review_service};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub cuisine: Option<String>,
    pub min_rating: Option<f64>,
    pub location: Option<String>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    pub days: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
    pub status: Option<OrderStatus>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

/// GET /restaurants - list restaurants
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Vec<Restaurant>>> {
    let page = query.page(CATALOG_MAX_LIMIT)?;
    let key = format!("list:{}:{}", page.skip, page.limit);
    let restaurants = state
        .cache
        .get_or_load(ns::RESTAURANTS, &key, CacheTtl::RestaurantsList, || {
            catalog_service::list_restaurants(state.pool(), page)
        })
        .await?;
    Ok(Json(restaurants))
}

/// GET /restaurants/active - list active restaurants
pub async fn list_active(
    State(state): State<ServerState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Vec<Restaurant>>> {
    let page = query.page(CATALOG_MAX_LIMIT)?;
    let key = format!("active:{}:{}", page.skip, page.limit);
    let restaurants = state
        .cache
        .get_or_load(ns::RESTAURANTS, &key, CacheTtl::ActiveRestaurants, || {
            catalog_service::list_active_restaurants(state.pool(), page)
        })
        .await?;
    Ok(Json(restaurants))
}

/// GET /restaurants/search - filter by cuisine, rating and location
pub async fn search(
    State(state): State<ServerState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Restaurant>>> {
    let page = pagination::page(query.skip, query.limit, CATALOG_MAX_LIMIT)?;
    if let Some(rating) = query.min_rating
        && !(0.0..=5.0).contains(&rating)
    {
        return Err(AppError::validation(format!(
            "min_rating must be between 0 and 5, got {rating}"
        )));
    }
    let filter = RestaurantSearch {
        cuisine: query.cuisine,
        min_rating: query.min_rating,
        location: query.location,
    };
    let key = format!(
        "search:{}:{}:{}:{}:{}",
        filter.cuisine.as_deref().unwrap_or(""),
        filter.min_rating.map(|r| r.to_string()).unwrap_or_default(),
        filter.location.as_deref().unwrap_or(""),
        page.skip,
        page.limit
    );
    let restaurants = state
        .cache
        .get_or_load(ns::RESTAURANTS, &key, CacheTtl::RestaurantSearch, || {
            catalog_service::search_restaurants(state.pool(), &filter, page)
        })
        .await?;
    Ok(Json(restaurants))
}

/// GET /restaurants/trending - most ordered restaurants of the last days
pub async fn trending(
    State(state): State<ServerState>,
    Query(query): Query<TrendingQuery>,
) -> AppResult<Json<Vec<TrendingRestaurant>>> {
    let days = pagination::bounded(query.days, "days", 7, 1, 30)?;
    let limit = pagination::bounded(query.limit, "limit", 10, 1, 50)?;
    let key = format!("trending:{days}:{limit}");
    let restaurants = state
        .cache
        .get_or_load(ns::RESTAURANTS, &key, CacheTtl::TrendingRestaurants, || {
            catalog_service::trending_restaurants(state.pool(), days, limit)
        })
        .await?;
    Ok(Json(restaurants))
}

/// GET /restaurants/{id} - get a restaurant
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Restaurant>> {
    let key = format!("detail:{id}");
    let restaurant = state
        .cache
        .get_or_load(ns::RESTAURANTS, &key, CacheTtl::RestaurantDetail, || {
            catalog_service::get_restaurant(state.pool(), id)
        })
        .await?;
    Ok(Json(restaurant))
}

/// POST /restaurants - create a restaurant
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<RestaurantCreate>,
) -> AppResult<(StatusCode, Json<Restaurant>)> {
    let restaurant = catalog_service::create_restaurant(state.pool(), &payload).await?;
    state.cache.invalidate(&[ns::RESTAURANTS]);
    Ok((StatusCode::CREATED, Json(restaurant)))
}

/// PUT /restaurants/{id} - partially update a restaurant
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<RestaurantUpdate>,
) -> AppResult<Json<Restaurant>> {
    let restaurant = catalog_service::update_restaurant(state.pool(), id, &payload).await?;
    state.cache.invalidate(&[ns::RESTAURANTS]);
    Ok(Json(restaurant))
}

/// DELETE /restaurants/{id} - delete a restaurant and everything under it
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Restaurant>> {
    let restaurant = catalog_service::delete_restaurant(state.pool(), id).await?;
    state
        .cache
        .invalidate(&[ns::RESTAURANTS, ns::MENU_ITEMS, ns::ORDERS, ns::REVIEWS]);
    Ok(Json(restaurant))
}

/// GET /restaurants/{id}/with-menu - restaurant with its menu
pub async fn get_with_menu(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<RestaurantWithMenu>> {
    let key = format!("with-menu:{id}");
    let restaurant = state
        .cache
        .get_or_load(ns::RESTAURANTS, &key, CacheTtl::RestaurantMenu, || {
            catalog_service::get_restaurant_with_menu(state.pool(), id)
        })
        .await?;
    Ok(Json(restaurant))
}

/// GET /restaurants/{id}/menu - menu items of a restaurant
pub async fn menu(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<MenuItem>>> {
    let key = format!("menu:{id}");
    let items = state
        .cache
        .get_or_load(ns::RESTAURANTS, &key, CacheTtl::RestaurantMenu, || {
            catalog_service::restaurant_menu(state.pool(), id)
        })
        .await?;
    Ok(Json(items))
}

/// POST /restaurants/{id}/menu-items - add a menu item to a restaurant
pub async fn create_menu_item(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(mut payload): Json<MenuItemCreate>,
) -> AppResult<(StatusCode, Json<MenuItem>)> {
    payload.restaurant_id = id;
    let item = catalog_service::create_menu_item(state.pool(), &payload).await?;
    state.cache.invalidate(&[ns::MENU_ITEMS, ns::RESTAURANTS]);
    Ok((StatusCode::CREATED, Json(item)))
}

/// GET /restaurants/{id}/reviews - reviews of a restaurant
pub async fn reviews(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Vec<Review>>> {
    let page = query.page(RECORD_MAX_LIMIT)?;
    let reviews = review_service::list_for_restaurant(state.pool(), id, page).await?;
    Ok(Json(reviews))
}

/// GET /restaurants/{id}/analytics - restaurant analytics
pub async fn analytics(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<RestaurantAnalytics>> {
    let analytics = analytics_service::restaurant_analytics(state.pool(), id).await?;
    Ok(Json(analytics))
}

/// GET /restaurants/{id}/orders - orders placed at a restaurant
pub async fn orders(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(query): Query<OrdersQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let page = pagination::page(query.skip, query.limit, RECORD_MAX_LIMIT)?;
    let filter = OrderFilter {
        restaurant_id: Some(id),
        status: query.status,
        ..Default::default()
    };
    let orders = order_service::list_orders(state.pool(), &filter, page).await?;
    Ok(Json(orders))
}

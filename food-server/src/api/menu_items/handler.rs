//! Menu Item API Handlers

use axum::extract::State;
use http::StatusCode;
use serde::Deserialize;
use shared::models::{
    MenuItem, MenuItemCreate, MenuItemUpdate, MenuItemWithRestaurant, PopularMenuItem,
};

use crate::api::extract::{Json, Path, Query};
use crate::api::pagination::{self, CATALOG_MAX_LIMIT, PageQuery};
use crate::cache::ns;
use crate::core::ServerState;
use crate::db::repository::menu_item::MenuItemSearch;
use crate::services::catalog_service;
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub restaurant_id: Option<i64>,
    pub category: Option<String>,
    pub is_vegetarian: Option<bool>,
    pub is_vegan: Option<bool>,
    pub is_available: Option<bool>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct PopularQuery {
    pub restaurant_id: Option<i64>,
    pub limit: Option<i64>,
}

/// GET /menu-items - list menu items
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Vec<MenuItem>>> {
    let page = query.page(CATALOG_MAX_LIMIT)?;
    let items = catalog_service::list_menu_items(state.pool(), page).await?;
    Ok(Json(items))
}

/// GET /menu-items/search - filter by category and dietary flags
pub async fn search(
    State(state): State<ServerState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<MenuItem>>> {
    let page = pagination::page(query.skip, query.limit, CATALOG_MAX_LIMIT)?;
    let filter = MenuItemSearch {
        restaurant_id: query.restaurant_id,
        category: query.category,
        is_vegetarian: query.is_vegetarian,
        is_vegan: query.is_vegan,
        is_available: query.is_available,
    };
    let items = catalog_service::search_menu_items(state.pool(), &filter, page).await?;
    Ok(Json(items))
}

/// GET /menu-items/popular - most ordered menu items
pub async fn popular(
    State(state): State<ServerState>,
    Query(query): Query<PopularQuery>,
) -> AppResult<Json<Vec<PopularMenuItem>>> {
    let limit = pagination::bounded(query.limit, "limit", 10, 1, 50)?;
    let items = catalog_service::popular_menu_items(state.pool(), query.restaurant_id, limit).await?;
    Ok(Json(items))
}

/// GET /menu-items/{id} - get a menu item
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MenuItem>> {
    let item = catalog_service::get_menu_item(state.pool(), id).await?;
    Ok(Json(item))
}

/// GET /menu-items/{id}/with-restaurant - menu item with its restaurant
pub async fn get_with_restaurant(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MenuItemWithRestaurant>> {
    let item = catalog_service::get_menu_item_with_restaurant(state.pool(), id).await?;
    Ok(Json(item))
}

/// POST /menu-items - create a menu item
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<(StatusCode, Json<MenuItem>)> {
    let item = catalog_service::create_menu_item(state.pool(), &payload).await?;
    state.cache.invalidate(&[ns::MENU_ITEMS, ns::RESTAURANTS]);
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /menu-items/{id} - partially update a menu item
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<MenuItem>> {
    let item = catalog_service::update_menu_item(state.pool(), id, &payload).await?;
    state.cache.invalidate(&[ns::MENU_ITEMS, ns::RESTAURANTS]);
    Ok(Json(item))
}

/// DELETE /menu-items/{id} - delete a menu item no order references
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MenuItem>> {
    let item = catalog_service::delete_menu_item(state.pool(), id).await?;
    state.cache.invalidate(&[ns::MENU_ITEMS, ns::RESTAURANTS]);
    Ok(Json(item))
}

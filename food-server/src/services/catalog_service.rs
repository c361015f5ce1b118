//! Catalog Service - restaurants and their menus
//!
//! Validation, uniqueness checks and the explicit restaurant cascade.
//! Updates merge the partial payload into the stored record and validate
//! the merged result, so cross-field rules (opening hours, vegan implies
//! vegetarian) hold no matter which fields were sent.

use shared::models::{
    MenuItem, MenuItemCreate, MenuItemUpdate, MenuItemWithRestaurant, PopularMenuItem, Restaurant,
    RestaurantCreate, RestaurantUpdate, RestaurantWithMenu, TrendingRestaurant,
};
use shared::util::{DAY_MILLIS, now_millis};
use sqlx::SqlitePool;

use crate::db::repository::menu_item::MenuItemSearch;
use crate::db::repository::restaurant::RestaurantSearch;
use crate::db::repository::{Page, RepoError, menu_item, order, restaurant, review};
use crate::utils::money;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_LABEL_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MIN_ADDRESS_LEN, MIN_NAME_LEN,
    validate_dietary_flags, validate_opening_hours, validate_optional_text, validate_phone,
    validate_preparation_time, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

// =============================================================================
// Restaurants
// =============================================================================

struct RestaurantFields<'a> {
    name: &'a str,
    description: &'a Option<String>,
    cuisine_type: &'a str,
    address: &'a str,
    phone_number: &'a str,
    opening_time: chrono::NaiveTime,
    closing_time: chrono::NaiveTime,
}

fn validate_restaurant(f: RestaurantFields<'_>) -> AppResult<()> {
    validate_required_text(f.name, "name", MIN_NAME_LEN, MAX_NAME_LEN)?;
    validate_optional_text(f.description, "description", MAX_NOTE_LEN)?;
    validate_required_text(f.cuisine_type, "cuisine_type", 1, MAX_LABEL_LEN)?;
    validate_required_text(f.address, "address", MIN_ADDRESS_LEN, MAX_ADDRESS_LEN)?;
    validate_phone(f.phone_number)?;
    validate_opening_hours(f.opening_time, f.closing_time)
}

fn name_taken(name: &str) -> AppError {
    AppError::with_message(
        ErrorCode::RestaurantNameExists,
        format!("Restaurant with name '{name}' already exists"),
    )
}

pub async fn create_restaurant(pool: &SqlitePool, data: &RestaurantCreate) -> AppResult<Restaurant> {
    validate_restaurant(RestaurantFields {
        name: &data.name,
        description: &data.description,
        cuisine_type: &data.cuisine_type,
        address: &data.address,
        phone_number: &data.phone_number,
        opening_time: data.opening_time,
        closing_time: data.closing_time,
    })?;
    if restaurant::find_by_name(pool, &data.name).await?.is_some() {
        return Err(name_taken(&data.name));
    }

    let created = restaurant::create(pool, data, now_millis())
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => name_taken(&data.name),
            other => other.into(),
        })?;
    tracing::info!(restaurant_id = created.id, name = %created.name, "Restaurant created");
    Ok(created)
}

pub async fn get_restaurant(pool: &SqlitePool, id: i64) -> AppResult<Restaurant> {
    restaurant::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))
}

pub async fn list_restaurants(pool: &SqlitePool, page: Page) -> AppResult<Vec<Restaurant>> {
    Ok(restaurant::find_all(pool, page).await?)
}

pub async fn list_active_restaurants(pool: &SqlitePool, page: Page) -> AppResult<Vec<Restaurant>> {
    Ok(restaurant::find_active(pool, page).await?)
}

pub async fn search_restaurants(
    pool: &SqlitePool,
    filter: &RestaurantSearch,
    page: Page,
) -> AppResult<Vec<Restaurant>> {
    Ok(restaurant::search(pool, filter, page).await?)
}

pub async fn update_restaurant(
    pool: &SqlitePool,
    id: i64,
    update: &RestaurantUpdate,
) -> AppResult<Restaurant> {
    let current = get_restaurant(pool, id).await?;
    let mut merged = current.clone();
    if let Some(name) = &update.name {
        merged.name = name.clone();
    }
    if let Some(description) = &update.description {
        merged.description = Some(description.clone());
    }
    if let Some(cuisine_type) = &update.cuisine_type {
        merged.cuisine_type = cuisine_type.clone();
    }
    if let Some(address) = &update.address {
        merged.address = address.clone();
    }
    if let Some(phone_number) = &update.phone_number {
        merged.phone_number = phone_number.clone();
    }
    if let Some(is_active) = update.is_active {
        merged.is_active = is_active;
    }
    if let Some(opening_time) = update.opening_time {
        merged.opening_time = opening_time;
    }
    if let Some(closing_time) = update.closing_time {
        merged.closing_time = closing_time;
    }

    validate_restaurant(RestaurantFields {
        name: &merged.name,
        description: &merged.description,
        cuisine_type: &merged.cuisine_type,
        address: &merged.address,
        phone_number: &merged.phone_number,
        opening_time: merged.opening_time,
        closing_time: merged.closing_time,
    })?;

    if merged.name != current.name
        && let Some(other) = restaurant::find_by_name(pool, &merged.name).await?
        && other.id != id
    {
        return Err(name_taken(&merged.name));
    }

    merged.updated_at = now_millis();
    let updated = restaurant::update(pool, &merged).await.map_err(|e| match e {
        RepoError::Duplicate(_) => name_taken(&merged.name),
        RepoError::NotFound(_) => AppError::new(ErrorCode::RestaurantNotFound),
        other => other.into(),
    })?;
    tracing::info!(restaurant_id = id, "Restaurant updated");
    Ok(updated)
}

/// Delete a restaurant with its reviews, orders, order lines and menu
///
/// Returns the deleted restaurant.
pub async fn delete_restaurant(pool: &SqlitePool, id: i64) -> AppResult<Restaurant> {
    let mut tx = pool.begin().await?;
    let existing = restaurant::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))?;

    let reviews = review::delete_by_restaurant(&mut *tx, id).await?;
    let order_items = order::delete_items_by_restaurant(&mut *tx, id).await?;
    let orders = order::delete_by_restaurant(&mut *tx, id).await?;
    let menu_items = menu_item::delete_by_restaurant(&mut *tx, id).await?;
    restaurant::delete(&mut *tx, id).await?;
    tx.commit().await?;

    tracing::info!(
        restaurant_id = id,
        reviews,
        order_items,
        orders,
        menu_items,
        "Restaurant deleted with dependents"
    );
    Ok(existing)
}

pub async fn get_restaurant_with_menu(pool: &SqlitePool, id: i64) -> AppResult<RestaurantWithMenu> {
    let restaurant = get_restaurant(pool, id).await?;
    let menu_items = menu_item::find_by_restaurant(pool, id).await?;
    Ok(RestaurantWithMenu {
        restaurant,
        menu_items,
    })
}

pub async fn restaurant_menu(pool: &SqlitePool, id: i64) -> AppResult<Vec<MenuItem>> {
    get_restaurant(pool, id).await?;
    Ok(menu_item::find_by_restaurant(pool, id).await?)
}

/// Restaurants with the most orders in the last `days` days
pub async fn trending_restaurants(
    pool: &SqlitePool,
    days: i64,
    limit: i64,
) -> AppResult<Vec<TrendingRestaurant>> {
    let since = now_millis() - days * DAY_MILLIS;
    Ok(restaurant::trending(pool, since, limit).await?)
}

// =============================================================================
// Menu items
// =============================================================================

struct MenuItemFields<'a> {
    name: &'a str,
    description: &'a Option<String>,
    price: rust_decimal::Decimal,
    category: &'a str,
    is_vegetarian: bool,
    is_vegan: bool,
    preparation_time: Option<i32>,
}

fn validate_menu_item(f: MenuItemFields<'_>) -> AppResult<()> {
    validate_required_text(f.name, "name", MIN_NAME_LEN, MAX_NAME_LEN)?;
    validate_optional_text(f.description, "description", MAX_NOTE_LEN)?;
    money::validate_price(f.price)
        .map_err(|e| AppError::with_message(ErrorCode::MenuItemInvalidPrice, e.message))?;
    validate_required_text(f.category, "category", 1, MAX_LABEL_LEN)?;
    validate_preparation_time(f.preparation_time)?;
    validate_dietary_flags(f.is_vegetarian, f.is_vegan)
}

pub async fn create_menu_item(pool: &SqlitePool, data: &MenuItemCreate) -> AppResult<MenuItem> {
    validate_menu_item(MenuItemFields {
        name: &data.name,
        description: &data.description,
        price: data.price,
        category: &data.category,
        is_vegetarian: data.is_vegetarian,
        is_vegan: data.is_vegan,
        preparation_time: data.preparation_time,
    })?;
    get_restaurant(pool, data.restaurant_id).await?;

    let created = menu_item::create(pool, data, now_millis()).await?;
    tracing::info!(
        menu_item_id = created.id,
        restaurant_id = created.restaurant_id,
        price = %created.price,
        "Menu item created"
    );
    Ok(created)
}

pub async fn get_menu_item(pool: &SqlitePool, id: i64) -> AppResult<MenuItem> {
    menu_item::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::MenuItemNotFound))
}

pub async fn get_menu_item_with_restaurant(
    pool: &SqlitePool,
    id: i64,
) -> AppResult<MenuItemWithRestaurant> {
    let menu_item = get_menu_item(pool, id).await?;
    let restaurant = get_restaurant(pool, menu_item.restaurant_id).await?;
    Ok(MenuItemWithRestaurant {
        menu_item,
        restaurant,
    })
}

pub async fn list_menu_items(pool: &SqlitePool, page: Page) -> AppResult<Vec<MenuItem>> {
    Ok(menu_item::search(pool, &MenuItemSearch::default(), page).await?)
}

pub async fn search_menu_items(
    pool: &SqlitePool,
    filter: &MenuItemSearch,
    page: Page,
) -> AppResult<Vec<MenuItem>> {
    Ok(menu_item::search(pool, filter, page).await?)
}

pub async fn update_menu_item(
    pool: &SqlitePool,
    id: i64,
    update: &MenuItemUpdate,
) -> AppResult<MenuItem> {
    let mut merged = get_menu_item(pool, id).await?;
    if let Some(name) = &update.name {
        merged.name = name.clone();
    }
    if let Some(description) = &update.description {
        merged.description = Some(description.clone());
    }
    if let Some(price) = update.price {
        merged.price = price;
    }
    if let Some(category) = &update.category {
        merged.category = category.clone();
    }
    if let Some(v) = update.is_vegetarian {
        merged.is_vegetarian = v;
    }
    if let Some(v) = update.is_vegan {
        merged.is_vegan = v;
    }
    if let Some(v) = update.is_available {
        merged.is_available = v;
    }
    if let Some(minutes) = update.preparation_time {
        merged.preparation_time = Some(minutes);
    }

    validate_menu_item(MenuItemFields {
        name: &merged.name,
        description: &merged.description,
        price: merged.price,
        category: &merged.category,
        is_vegetarian: merged.is_vegetarian,
        is_vegan: merged.is_vegan,
        preparation_time: merged.preparation_time,
    })?;

    merged.updated_at = now_millis();
    let updated = menu_item::update(pool, &merged).await.map_err(|e| match e {
        RepoError::NotFound(_) => AppError::new(ErrorCode::MenuItemNotFound),
        other => other.into(),
    })?;
    tracing::info!(menu_item_id = id, "Menu item updated");
    Ok(updated)
}

/// Delete a menu item that no order references; returns the deleted item
pub async fn delete_menu_item(pool: &SqlitePool, id: i64) -> AppResult<MenuItem> {
    let existing = get_menu_item(pool, id).await?;
    let references = menu_item::count_order_references(pool, id).await?;
    if references > 0 {
        return Err(AppError::new(ErrorCode::MenuItemInUse).with_detail("order_items", references));
    }
    menu_item::delete(pool, id).await.map_err(|e| match e {
        RepoError::ForeignKey(_) => AppError::new(ErrorCode::MenuItemInUse),
        other => other.into(),
    })?;
    tracing::info!(menu_item_id = id, "Menu item deleted");
    Ok(existing)
}

pub async fn popular_menu_items(
    pool: &SqlitePool,
    restaurant_id: Option<i64>,
    limit: i64,
) -> AppResult<Vec<PopularMenuItem>> {
    Ok(menu_item::popular(pool, restaurant_id, limit).await?)
}

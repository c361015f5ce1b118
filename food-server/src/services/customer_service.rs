//! Customer Service
//!
//! Customer CRUD, the customer cascade and restaurant recommendations.

use shared::models::{Customer, CustomerCreate, CustomerUpdate, Restaurant};
use shared::util::now_millis;
use sqlx::SqlitePool;

use crate::db::repository::{Page, RepoError, customer, order, restaurant, review};
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MIN_ADDRESS_LEN, MIN_PERSON_NAME_LEN, validate_email,
    validate_phone, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Cuisines considered when recommending
const FAVORITE_CUISINES: i64 = 3;
/// Minimum rating for restaurants in a favourite cuisine
const CUISINE_MATCH_MIN_RATING: f64 = 3.5;
/// Minimum rating when the customer has no order history
const FALLBACK_MIN_RATING: f64 = 4.0;

fn validate_customer(name: &str, email: &str, phone_number: &str, address: &str) -> AppResult<()> {
    validate_required_text(name, "name", MIN_PERSON_NAME_LEN, MAX_NAME_LEN)?;
    validate_email(email)?;
    validate_phone(phone_number)?;
    validate_required_text(address, "address", MIN_ADDRESS_LEN, MAX_ADDRESS_LEN)
}

fn email_taken(email: &str) -> AppError {
    AppError::with_message(
        ErrorCode::CustomerEmailExists,
        format!("Customer with email '{email}' already exists"),
    )
}

pub async fn create_customer(pool: &SqlitePool, data: &CustomerCreate) -> AppResult<Customer> {
    validate_customer(&data.name, &data.email, &data.phone_number, &data.address)?;
    if customer::find_by_email(pool, &data.email).await?.is_some() {
        return Err(email_taken(&data.email));
    }

    let created = customer::create(pool, data, now_millis())
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => email_taken(&data.email),
            other => other.into(),
        })?;
    tracing::info!(customer_id = created.id, "Customer created");
    Ok(created)
}

pub async fn get_customer(pool: &SqlitePool, id: i64) -> AppResult<Customer> {
    customer::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CustomerNotFound))
}

pub async fn list_customers(pool: &SqlitePool, page: Page) -> AppResult<Vec<Customer>> {
    Ok(customer::find_all(pool, page).await?)
}

pub async fn update_customer(
    pool: &SqlitePool,
    id: i64,
    update: &CustomerUpdate,
) -> AppResult<Customer> {
    let current = get_customer(pool, id).await?;
    let mut merged = current.clone();
    if let Some(name) = &update.name {
        merged.name = name.clone();
    }
    if let Some(email) = &update.email {
        merged.email = email.clone();
    }
    if let Some(phone_number) = &update.phone_number {
        merged.phone_number = phone_number.clone();
    }
    if let Some(address) = &update.address {
        merged.address = address.clone();
    }
    if let Some(is_active) = update.is_active {
        merged.is_active = is_active;
    }
    validate_customer(
        &merged.name,
        &merged.email,
        &merged.phone_number,
        &merged.address,
    )?;

    if merged.email != current.email
        && let Some(other) = customer::find_by_email(pool, &merged.email).await?
        && other.id != id
    {
        return Err(email_taken(&merged.email));
    }

    merged.updated_at = now_millis();
    let updated = customer::update(pool, &merged).await.map_err(|e| match e {
        RepoError::Duplicate(_) => email_taken(&merged.email),
        RepoError::NotFound(_) => AppError::new(ErrorCode::CustomerNotFound),
        other => other.into(),
    })?;
    tracing::info!(customer_id = id, "Customer updated");
    Ok(updated)
}

/// Delete a customer with their reviews, orders and order lines
///
/// Ratings of the restaurants the customer reviewed are recomputed in the
/// same transaction.
pub async fn delete_customer(pool: &SqlitePool, id: i64) -> AppResult<()> {
    let mut tx = pool.begin().await?;
    customer::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CustomerNotFound))?;

    let reviewed = review::restaurant_ids_for_customer(&mut *tx, id).await?;
    let reviews = review::delete_by_customer(&mut *tx, id).await?;
    let order_items = order::delete_items_by_customer(&mut *tx, id).await?;
    let orders = order::delete_by_customer(&mut *tx, id).await?;
    customer::delete(&mut *tx, id).await?;

    let now = now_millis();
    for restaurant_id in &reviewed {
        restaurant::recompute_rating(&mut tx, *restaurant_id, now).await?;
    }
    tx.commit().await?;

    tracing::info!(
        customer_id = id,
        reviews,
        order_items,
        orders,
        ratings_recomputed = reviewed.len(),
        "Customer deleted with dependents"
    );
    Ok(())
}

/// Restaurants to suggest to a customer
///
/// Active restaurants in the customer's most ordered cuisines they have not
/// ordered from yet. Without order history, the best rated active
/// restaurants.
pub async fn recommendations(
    pool: &SqlitePool,
    customer_id: i64,
    limit: i64,
) -> AppResult<Vec<Restaurant>> {
    get_customer(pool, customer_id).await?;

    let cuisines = order::favorite_cuisines(pool, customer_id, FAVORITE_CUISINES).await?;
    let restaurants = if cuisines.is_empty() {
        restaurant::top_rated(pool, FALLBACK_MIN_RATING, limit).await?
    } else {
        restaurant::unvisited_in_cuisines(
            pool,
            customer_id,
            &cuisines,
            CUISINE_MATCH_MIN_RATING,
            limit,
        )
        .await?
    };
    tracing::debug!(
        customer_id,
        cuisines = ?cuisines,
        count = restaurants.len(),
        "Recommendations computed"
    );
    Ok(restaurants)
}

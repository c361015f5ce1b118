//! Review Service
//!
//! One review per (order, customer), only for delivered orders. Each new
//! review recomputes the restaurant rating from scratch in the same
//! transaction as the insert.

use shared::models::{OrderStatus, Review, ReviewCreate};
use shared::util::now_millis;
use sqlx::SqlitePool;

use crate::db::repository::review::NewReview;
use crate::db::repository::{Page, RepoError, customer, order, restaurant, review};
use crate::utils::validation::{MAX_COMMENT_LEN, validate_optional_text, validate_rating};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Create a review for a delivered order
pub async fn create_review(
    pool: &SqlitePool,
    order_id: i64,
    customer_id: i64,
    data: &ReviewCreate,
) -> AppResult<Review> {
    validate_rating(data.rating)?;
    validate_optional_text(&data.comment, "comment", MAX_COMMENT_LEN)?;

    let mut tx = pool.begin().await?;

    customer::find_by_id(&mut *tx, customer_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CustomerNotFound))?;

    let order = order::find_by_id(&mut *tx, order_id)
        .await?
        .filter(|o| o.customer_id == customer_id && o.order_status == OrderStatus::Delivered)
        .ok_or_else(|| AppError::new(ErrorCode::ReviewNotAllowed))?;

    if review::find_by_order_and_customer(&mut *tx, order_id, customer_id)
        .await?
        .is_some()
    {
        return Err(AppError::new(ErrorCode::ReviewAlreadyExists));
    }

    let review_id = review::insert(
        &mut *tx,
        &NewReview {
            customer_id,
            restaurant_id: order.restaurant_id,
            order_id,
            rating: data.rating,
            comment: data.comment.as_deref(),
            created_at: now_millis(),
        },
    )
    .await
    .map_err(|e| match e {
        RepoError::Duplicate(_) => AppError::new(ErrorCode::ReviewAlreadyExists),
        other => other.into(),
    })?;

    let rating = restaurant::recompute_rating(&mut tx, order.restaurant_id, now_millis()).await?;
    let created = review::find_by_id(&mut *tx, review_id)
        .await?
        .ok_or_else(|| AppError::internal("Review vanished after insert"))?;
    tx.commit().await?;

    tracing::info!(
        review_id,
        order_id,
        customer_id,
        restaurant_id = order.restaurant_id,
        rating = created.rating,
        restaurant_rating = rating,
        "Review created"
    );
    Ok(created)
}

pub async fn list_for_restaurant(
    pool: &SqlitePool,
    restaurant_id: i64,
    page: Page,
) -> AppResult<Vec<Review>> {
    restaurant::find_by_id(pool, restaurant_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))?;
    Ok(review::find_by_restaurant(pool, restaurant_id, page).await?)
}

pub async fn list_for_customer(
    pool: &SqlitePool,
    customer_id: i64,
    page: Page,
) -> AppResult<Vec<Review>> {
    customer::find_by_id(pool, customer_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CustomerNotFound))?;
    Ok(review::find_by_customer(pool, customer_id, page).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::{
        customer_payload, menu_item_payload, restaurant_payload, test_pool,
    };
    use crate::db::repository::menu_item;
    use crate::services::order_service;
    use shared::models::{OrderCreate, OrderItemCreate, OrderUpdate};

    struct Fixture {
        restaurant_id: i64,
        customer_id: i64,
        menu_item_id: i64,
    }

    async fn fixture(pool: &SqlitePool) -> Fixture {
        let r = restaurant::create(pool, &restaurant_payload("Noodle Bar", "Chinese"), 0)
            .await
            .unwrap();
        let m = menu_item::create(pool, &menu_item_payload(r.id, "Dan Dan Noodles", "11.00"), 0)
            .await
            .unwrap();
        let c = customer::create(pool, &customer_payload("Li Wei", "li@example.com"), 0)
            .await
            .unwrap();
        Fixture {
            restaurant_id: r.id,
            customer_id: c.id,
            menu_item_id: m.id,
        }
    }

    async fn order_with_status(pool: &SqlitePool, f: &Fixture, path: &[OrderStatus]) -> i64 {
        let placed = order_service::place_order(
            pool,
            f.customer_id,
            &OrderCreate {
                restaurant_id: f.restaurant_id,
                delivery_address: "88 Harbour Road".into(),
                special_instructions: None,
                items: vec![OrderItemCreate {
                    menu_item_id: f.menu_item_id,
                    quantity: 1,
                    special_requests: None,
                }],
            },
        )
        .await
        .unwrap();
        for status in path {
            let update = OrderUpdate {
                order_status: Some(*status),
                ..Default::default()
            };
            order_service::update_order(pool, placed.order.id, &update)
                .await
                .unwrap();
        }
        placed.order.id
    }

    const DELIVERED_PATH: [OrderStatus; 4] = [
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
    ];

    fn stars(rating: i32) -> ReviewCreate {
        ReviewCreate {
            rating,
            comment: Some("Tasty".into()),
        }
    }

    async fn restaurant_rating(pool: &SqlitePool, id: i64) -> f64 {
        restaurant::find_by_id(pool, id).await.unwrap().unwrap().rating
    }

    #[tokio::test]
    async fn test_rating_is_mean_of_reviews() {
        let pool = test_pool().await;
        let f = fixture(&pool).await;

        for rating in [5, 4, 2] {
            let order_id = order_with_status(&pool, &f, &DELIVERED_PATH).await;
            create_review(&pool, order_id, f.customer_id, &stars(rating))
                .await
                .unwrap();
        }
        let rating = restaurant_rating(&pool, f.restaurant_id).await;
        assert!((rating - 11.0 / 3.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_second_review_conflicts_and_keeps_rating() {
        let pool = test_pool().await;
        let f = fixture(&pool).await;
        let order_id = order_with_status(&pool, &f, &DELIVERED_PATH).await;

        create_review(&pool, order_id, f.customer_id, &stars(5))
            .await
            .unwrap();
        let err = create_review(&pool, order_id, f.customer_id, &stars(1))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ReviewAlreadyExists);
        assert_eq!(restaurant_rating(&pool, f.restaurant_id).await, 5.0);
    }

    #[tokio::test]
    async fn test_review_requires_delivered_own_order() {
        let pool = test_pool().await;
        let f = fixture(&pool).await;

        let pending = order_with_status(&pool, &f, &[OrderStatus::Confirmed]).await;
        let err = create_review(&pool, pending, f.customer_id, &stars(4))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ReviewNotAllowed);
        assert_eq!(
            err.message,
            "Order not found, doesn't belong to customer, or not completed"
        );

        let delivered = order_with_status(&pool, &f, &DELIVERED_PATH).await;
        let other = customer::create(&pool, &customer_payload("Other One", "other@example.com"), 0)
            .await
            .unwrap();
        let err = create_review(&pool, delivered, other.id, &stars(4))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ReviewNotAllowed);

        let err = create_review(&pool, delivered, 999, &stars(4))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CustomerNotFound);

        let err = create_review(&pool, delivered, f.customer_id, &stars(6))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}

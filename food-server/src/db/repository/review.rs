//! Review Repository

use super::{Page, RepoResult};
use shared::models::Review;
use sqlx::{Sqlite, SqlitePool};

const COLUMNS: &str = "id, customer_id, restaurant_id, order_id, rating, comment, created_at";

/// Review count and mean rating of a restaurant
#[derive(Debug, Clone, Copy, PartialEq, sqlx::FromRow)]
pub struct ReviewStats {
    pub total_reviews: i64,
    pub average_rating: f64,
}

/// New review row
#[derive(Debug, Clone)]
pub struct NewReview<'a> {
    pub customer_id: i64,
    pub restaurant_id: i64,
    pub order_id: i64,
    pub rating: i32,
    pub comment: Option<&'a str>,
    pub created_at: i64,
}

pub async fn find_by_id(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    id: i64,
) -> RepoResult<Option<Review>> {
    let sql = format!("SELECT {COLUMNS} FROM reviews WHERE id = ?");
    let review = sqlx::query_as::<_, Review>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(review)
}

pub async fn find_by_order_and_customer(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    order_id: i64,
    customer_id: i64,
) -> RepoResult<Option<Review>> {
    let sql = format!("SELECT {COLUMNS} FROM reviews WHERE order_id = ? AND customer_id = ?");
    let review = sqlx::query_as::<_, Review>(&sql)
        .bind(order_id)
        .bind(customer_id)
        .fetch_optional(conn)
        .await?;
    Ok(review)
}

pub async fn insert(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    review: &NewReview<'_>,
) -> RepoResult<i64> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO reviews (customer_id, restaurant_id, order_id, rating, comment, created_at) \
         VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(review.customer_id)
    .bind(review.restaurant_id)
    .bind(review.order_id)
    .bind(review.rating)
    .bind(review.comment)
    .bind(review.created_at)
    .fetch_one(conn)
    .await?;
    Ok(id)
}

/// Reviews of a restaurant, newest first
pub async fn find_by_restaurant(
    pool: &SqlitePool,
    restaurant_id: i64,
    page: Page,
) -> RepoResult<Vec<Review>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM reviews WHERE restaurant_id = ? \
         ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"
    );
    let reviews = sqlx::query_as::<_, Review>(&sql)
        .bind(restaurant_id)
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(pool)
        .await?;
    Ok(reviews)
}

/// Reviews written by a customer, newest first
pub async fn find_by_customer(
    pool: &SqlitePool,
    customer_id: i64,
    page: Page,
) -> RepoResult<Vec<Review>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM reviews WHERE customer_id = ? \
         ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"
    );
    let reviews = sqlx::query_as::<_, Review>(&sql)
        .bind(customer_id)
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(pool)
        .await?;
    Ok(reviews)
}

pub async fn stats_for_restaurant(pool: &SqlitePool, restaurant_id: i64) -> RepoResult<ReviewStats> {
    let stats = sqlx::query_as::<_, ReviewStats>(
        "SELECT COUNT(*) AS total_reviews, \
                COALESCE(AVG(CAST(rating AS REAL)), 0.0) AS average_rating \
         FROM reviews WHERE restaurant_id = ?",
    )
    .bind(restaurant_id)
    .fetch_one(pool)
    .await?;
    Ok(stats)
}

/// Restaurants a customer has reviewed
pub async fn restaurant_ids_for_customer(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    customer_id: i64,
) -> RepoResult<Vec<i64>> {
    let ids: Vec<i64> = sqlx::query_scalar(
        "SELECT DISTINCT restaurant_id FROM reviews WHERE customer_id = ? ORDER BY restaurant_id",
    )
    .bind(customer_id)
    .fetch_all(conn)
    .await?;
    Ok(ids)
}

pub async fn delete_by_customer(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    customer_id: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM reviews WHERE customer_id = ?")
        .bind(customer_id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected())
}

pub async fn delete_by_restaurant(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    restaurant_id: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM reviews WHERE restaurant_id = ?")
        .bind(restaurant_id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::order::{self, NewOrder};
    use crate::db::repository::test_support::{customer_payload, restaurant_payload, test_pool};
    use crate::db::repository::{RepoError, customer, restaurant};

    async fn seed_order(pool: &SqlitePool) -> (i64, i64, i64) {
        let r = restaurant::create(pool, &restaurant_payload("Taco Stand", "Mexican"), 0)
            .await
            .unwrap();
        let c = customer::create(pool, &customer_payload("Maria Gomez", "maria@example.com"), 0)
            .await
            .unwrap();
        let order_id = order::insert(
            pool,
            &NewOrder {
                customer_id: c.id,
                restaurant_id: r.id,
                total_amount_cents: 900,
                delivery_address: "1 Plaza Mayor",
                special_instructions: None,
                order_date: 0,
            },
        )
        .await
        .unwrap();
        (r.id, c.id, order_id)
    }

    fn new_review(r: i64, c: i64, o: i64, rating: i32) -> NewReview<'static> {
        NewReview {
            customer_id: c,
            restaurant_id: r,
            order_id: o,
            rating,
            comment: Some("Great tacos"),
            created_at: 5,
        }
    }

    #[tokio::test]
    async fn test_one_review_per_order_and_customer() {
        let pool = test_pool().await;
        let (r, c, o) = seed_order(&pool).await;

        let id = insert(&pool, &new_review(r, c, o, 5)).await.unwrap();
        let found = find_by_order_and_customer(&pool, o, c).await.unwrap().unwrap();
        assert_eq!(found.id, id);
        assert_eq!(find_by_id(&pool, id).await.unwrap(), Some(found));

        let err = insert(&pool, &new_review(r, c, o, 3)).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_stats_without_reviews() {
        let pool = test_pool().await;
        let (r, _, _) = seed_order(&pool).await;
        let stats = stats_for_restaurant(&pool, r).await.unwrap();
        assert_eq!(stats.total_reviews, 0);
        assert_eq!(stats.average_rating, 0.0);
    }

    #[tokio::test]
    async fn test_rating_check_constraint() {
        let pool = test_pool().await;
        let (r, c, o) = seed_order(&pool).await;
        assert!(insert(&pool, &new_review(r, c, o, 6)).await.is_err());
    }
}

//! Restaurant Repository

use super::{Page, RepoError, RepoResult};
use crate::utils::money;
use shared::models::{Restaurant, RestaurantCreate, TrendingRestaurant};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const COLUMNS: &str = "id, name, description, cuisine_type, address, phone_number, rating, \
                       is_active, opening_time, closing_time, created_at, updated_at";

/// Filters for restaurant search (active restaurants only)
#[derive(Debug, Clone, Default)]
pub struct RestaurantSearch {
    /// Case-insensitive substring of the cuisine type
    pub cuisine: Option<String>,
    pub min_rating: Option<f64>,
    /// Case-insensitive substring of the address
    pub location: Option<String>,
}

#[derive(sqlx::FromRow)]
struct TrendingRow {
    id: i64,
    name: String,
    cuisine_type: String,
    rating: f64,
    recent_orders: i64,
    recent_revenue_cents: i64,
}

impl From<TrendingRow> for TrendingRestaurant {
    fn from(row: TrendingRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            cuisine_type: row.cuisine_type,
            rating: row.rating,
            recent_orders: row.recent_orders,
            recent_revenue: money::from_cents(row.recent_revenue_cents),
        }
    }
}

pub async fn find_by_id(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    id: i64,
) -> RepoResult<Option<Restaurant>> {
    let sql = format!("SELECT {COLUMNS} FROM restaurants WHERE id = ?");
    let restaurant = sqlx::query_as::<_, Restaurant>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(restaurant)
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<Restaurant>> {
    let sql = format!("SELECT {COLUMNS} FROM restaurants WHERE name = ? LIMIT 1");
    let restaurant = sqlx::query_as::<_, Restaurant>(&sql)
        .bind(name)
        .fetch_optional(pool)
        .await?;
    Ok(restaurant)
}

pub async fn find_all(pool: &SqlitePool, page: Page) -> RepoResult<Vec<Restaurant>> {
    let sql = format!("SELECT {COLUMNS} FROM restaurants ORDER BY id LIMIT ? OFFSET ?");
    let restaurants = sqlx::query_as::<_, Restaurant>(&sql)
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(pool)
        .await?;
    Ok(restaurants)
}

pub async fn find_active(pool: &SqlitePool, page: Page) -> RepoResult<Vec<Restaurant>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM restaurants WHERE is_active = 1 ORDER BY id LIMIT ? OFFSET ?"
    );
    let restaurants = sqlx::query_as::<_, Restaurant>(&sql)
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(pool)
        .await?;
    Ok(restaurants)
}

/// Active restaurants matching every given filter, best rated first
pub async fn search(
    pool: &SqlitePool,
    filter: &RestaurantSearch,
    page: Page,
) -> RepoResult<Vec<Restaurant>> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
        "SELECT {COLUMNS} FROM restaurants WHERE is_active = 1"
    ));
    if let Some(cuisine) = filter.cuisine.as_deref().filter(|s| !s.is_empty()) {
        qb.push(" AND LOWER(cuisine_type) LIKE ")
            .push_bind(format!("%{}%", cuisine.to_lowercase()));
    }
    if let Some(min_rating) = filter.min_rating {
        qb.push(" AND rating >= ").push_bind(min_rating);
    }
    if let Some(location) = filter.location.as_deref().filter(|s| !s.is_empty()) {
        qb.push(" AND LOWER(address) LIKE ")
            .push_bind(format!("%{}%", location.to_lowercase()));
    }
    qb.push(" ORDER BY rating DESC, id LIMIT ")
        .push_bind(page.limit)
        .push(" OFFSET ")
        .push_bind(page.skip);

    let restaurants = qb.build_query_as::<Restaurant>().fetch_all(pool).await?;
    Ok(restaurants)
}

pub async fn create(pool: &SqlitePool, data: &RestaurantCreate, now: i64) -> RepoResult<Restaurant> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO restaurants (name, description, cuisine_type, address, phone_number, \
         opening_time, closing_time, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(&data.cuisine_type)
    .bind(&data.address)
    .bind(&data.phone_number)
    .bind(data.opening_time)
    .bind(data.closing_time)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create restaurant".into()))
}

/// Overwrite the editable columns with an already merged record
pub async fn update(pool: &SqlitePool, restaurant: &Restaurant) -> RepoResult<Restaurant> {
    let rows = sqlx::query(
        "UPDATE restaurants SET name = ?, description = ?, cuisine_type = ?, address = ?, \
         phone_number = ?, is_active = ?, opening_time = ?, closing_time = ?, updated_at = ? \
         WHERE id = ?",
    )
    .bind(&restaurant.name)
    .bind(&restaurant.description)
    .bind(&restaurant.cuisine_type)
    .bind(&restaurant.address)
    .bind(&restaurant.phone_number)
    .bind(restaurant.is_active)
    .bind(restaurant.opening_time)
    .bind(restaurant.closing_time)
    .bind(restaurant.updated_at)
    .bind(restaurant.id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Restaurant {} not found",
            restaurant.id
        )));
    }
    find_by_id(pool, restaurant.id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Restaurant {} not found", restaurant.id)))
}

pub async fn delete(conn: impl sqlx::Executor<'_, Database = Sqlite>, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM restaurants WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Recompute the cached rating as the mean of all reviews (0.0 without reviews)
pub async fn recompute_rating(
    conn: &mut sqlx::SqliteConnection,
    id: i64,
    now: i64,
) -> RepoResult<f64> {
    let avg: Option<f64> =
        sqlx::query_scalar("SELECT AVG(CAST(rating AS REAL)) FROM reviews WHERE restaurant_id = ?")
            .bind(id)
            .fetch_one(&mut *conn)
            .await?;
    let rating = avg.unwrap_or(0.0);
    sqlx::query("UPDATE restaurants SET rating = ?, updated_at = ? WHERE id = ?")
        .bind(rating)
        .bind(now)
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(rating)
}

/// Restaurants with the most orders placed since `since` (Unix millis)
pub async fn trending(
    pool: &SqlitePool,
    since: i64,
    limit: i64,
) -> RepoResult<Vec<TrendingRestaurant>> {
    let rows = sqlx::query_as::<_, TrendingRow>(
        "SELECT r.id, r.name, r.cuisine_type, r.rating, \
                COUNT(o.id) AS recent_orders, \
                COALESCE(SUM(o.total_amount_cents), 0) AS recent_revenue_cents \
         FROM restaurants r JOIN orders o ON o.restaurant_id = r.id \
         WHERE o.order_date >= ? \
         GROUP BY r.id, r.name, r.cuisine_type, r.rating \
         ORDER BY recent_orders DESC, r.id \
         LIMIT ?",
    )
    .bind(since)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Active restaurants rated at least `min_rating`, best first
pub async fn top_rated(pool: &SqlitePool, min_rating: f64, limit: i64) -> RepoResult<Vec<Restaurant>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM restaurants WHERE is_active = 1 AND rating >= ? \
         ORDER BY rating DESC, id LIMIT ?"
    );
    let restaurants = sqlx::query_as::<_, Restaurant>(&sql)
        .bind(min_rating)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(restaurants)
}

/// Active restaurants in the given cuisines the customer never ordered from
pub async fn unvisited_in_cuisines(
    pool: &SqlitePool,
    customer_id: i64,
    cuisines: &[String],
    min_rating: f64,
    limit: i64,
) -> RepoResult<Vec<Restaurant>> {
    if cuisines.is_empty() {
        return Ok(Vec::new());
    }
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
        "SELECT {COLUMNS} FROM restaurants WHERE is_active = 1 AND rating >= "
    ));
    qb.push_bind(min_rating);
    qb.push(" AND cuisine_type IN (");
    let mut separated = qb.separated(", ");
    for cuisine in cuisines {
        separated.push_bind(cuisine);
    }
    separated.push_unseparated(")");
    qb.push(" AND id NOT IN (SELECT DISTINCT restaurant_id FROM orders WHERE customer_id = ")
        .push_bind(customer_id)
        .push(") ORDER BY rating DESC, id LIMIT ")
        .push_bind(limit);

    let restaurants = qb.build_query_as::<Restaurant>().fetch_all(pool).await?;
    Ok(restaurants)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::{restaurant_payload, test_pool};

    #[tokio::test]
    async fn test_create_and_find() {
        let pool = test_pool().await;
        let created = create(&pool, &restaurant_payload("Pizza Palace", "Italian"), 1000)
            .await
            .unwrap();
        assert_eq!(created.name, "Pizza Palace");
        assert_eq!(created.rating, 0.0);
        assert!(created.is_active);
        assert_eq!(created.created_at, 1000);

        let found = find_by_id(&pool, created.id).await.unwrap().unwrap();
        assert_eq!(found, created);
        assert!(find_by_name(&pool, "Pizza Palace").await.unwrap().is_some());
        assert!(find_by_id(&pool, 999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_name_is_classified() {
        let pool = test_pool().await;
        create(&pool, &restaurant_payload("Pizza Palace", "Italian"), 0)
            .await
            .unwrap();
        let err = create(&pool, &restaurant_payload("Pizza Palace", "Pizza"), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_search_filters_and_orders_by_rating() {
        let pool = test_pool().await;
        let a = create(&pool, &restaurant_payload("Trattoria Uno", "Italian"), 0)
            .await
            .unwrap();
        let b = create(&pool, &restaurant_payload("Trattoria Due", "ITALIAN"), 0)
            .await
            .unwrap();
        create(&pool, &restaurant_payload("Sushi Go", "Japanese"), 0)
            .await
            .unwrap();
        sqlx::query("UPDATE restaurants SET rating = 4.5 WHERE id = ?")
            .bind(b.id)
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("UPDATE restaurants SET rating = 3.0 WHERE id = ?")
            .bind(a.id)
            .execute(&pool)
            .await
            .unwrap();

        let filter = RestaurantSearch {
            cuisine: Some("ital".into()),
            ..Default::default()
        };
        let found = search(&pool, &filter, Page::default()).await.unwrap();
        let ids: Vec<i64> = found.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);

        let filter = RestaurantSearch {
            cuisine: Some("ital".into()),
            min_rating: Some(4.0),
            location: Some("MARKET".into()),
        };
        let found = search(&pool, &filter, Page::default()).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, b.id);

        sqlx::query("UPDATE restaurants SET is_active = 0 WHERE id = ?")
            .bind(b.id)
            .execute(&pool)
            .await
            .unwrap();
        let found = search(&pool, &RestaurantSearch::default(), Page::default())
            .await
            .unwrap();
        assert!(found.iter().all(|r| r.id != b.id));
    }

    #[tokio::test]
    async fn test_recompute_rating_without_reviews_is_zero() {
        let pool = test_pool().await;
        let r = create(&pool, &restaurant_payload("Empty House", "Thai"), 0)
            .await
            .unwrap();
        let mut conn = pool.acquire().await.unwrap();
        let rating = recompute_rating(&mut conn, r.id, 5).await.unwrap();
        assert_eq!(rating, 0.0);
    }
}

//! Menu Item Repository

use super::{Page, RepoError, RepoResult};
use crate::utils::money;
use shared::models::{MenuItem, MenuItemCreate, PopularMenuItem};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const COLUMNS: &str = "id, restaurant_id, name, description, price_cents, category, is_vegetarian, \
                       is_vegan, is_available, preparation_time, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct MenuItemRow {
    id: i64,
    restaurant_id: i64,
    name: String,
    description: Option<String>,
    price_cents: i64,
    category: String,
    is_vegetarian: bool,
    is_vegan: bool,
    is_available: bool,
    preparation_time: Option<i32>,
    created_at: i64,
    updated_at: i64,
}

impl From<MenuItemRow> for MenuItem {
    fn from(row: MenuItemRow) -> Self {
        Self {
            id: row.id,
            restaurant_id: row.restaurant_id,
            name: row.name,
            description: row.description,
            price: money::from_cents(row.price_cents),
            category: row.category,
            is_vegetarian: row.is_vegetarian,
            is_vegan: row.is_vegan,
            is_available: row.is_available,
            preparation_time: row.preparation_time,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Filters for menu item search
#[derive(Debug, Clone, Default)]
pub struct MenuItemSearch {
    pub restaurant_id: Option<i64>,
    /// Case-insensitive substring of the category
    pub category: Option<String>,
    pub is_vegetarian: Option<bool>,
    pub is_vegan: Option<bool>,
    pub is_available: Option<bool>,
}

pub async fn find_by_id(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    id: i64,
) -> RepoResult<Option<MenuItem>> {
    let sql = format!("SELECT {COLUMNS} FROM menu_items WHERE id = ?");
    let row = sqlx::query_as::<_, MenuItemRow>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(row.map(Into::into))
}

/// Load every menu item whose id is in `ids` (missing ids are skipped)
pub async fn find_by_ids(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    ids: &[i64],
) -> RepoResult<Vec<MenuItem>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {COLUMNS} FROM menu_items WHERE id IN ("));
    let mut separated = qb.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
    let rows = qb.build_query_as::<MenuItemRow>().fetch_all(conn).await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn find_by_restaurant(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    restaurant_id: i64,
) -> RepoResult<Vec<MenuItem>> {
    let sql = format!("SELECT {COLUMNS} FROM menu_items WHERE restaurant_id = ? ORDER BY id");
    let rows = sqlx::query_as::<_, MenuItemRow>(&sql)
        .bind(restaurant_id)
        .fetch_all(conn)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Menu items matching every given filter, ordered by id
pub async fn search(
    pool: &SqlitePool,
    filter: &MenuItemSearch,
    page: Page,
) -> RepoResult<Vec<MenuItem>> {
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {COLUMNS} FROM menu_items WHERE 1 = 1"));
    if let Some(restaurant_id) = filter.restaurant_id {
        qb.push(" AND restaurant_id = ").push_bind(restaurant_id);
    }
    if let Some(category) = filter.category.as_deref().filter(|s| !s.is_empty()) {
        qb.push(" AND LOWER(category) LIKE ")
            .push_bind(format!("%{}%", category.to_lowercase()));
    }
    if let Some(v) = filter.is_vegetarian {
        qb.push(" AND is_vegetarian = ").push_bind(v);
    }
    if let Some(v) = filter.is_vegan {
        qb.push(" AND is_vegan = ").push_bind(v);
    }
    if let Some(v) = filter.is_available {
        qb.push(" AND is_available = ").push_bind(v);
    }
    qb.push(" ORDER BY id LIMIT ")
        .push_bind(page.limit)
        .push(" OFFSET ")
        .push_bind(page.skip);

    let rows = qb.build_query_as::<MenuItemRow>().fetch_all(pool).await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn create(pool: &SqlitePool, data: &MenuItemCreate, now: i64) -> RepoResult<MenuItem> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO menu_items (restaurant_id, name, description, price_cents, category, \
         is_vegetarian, is_vegan, is_available, preparation_time, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(data.restaurant_id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(money::to_cents(data.price))
    .bind(&data.category)
    .bind(data.is_vegetarian)
    .bind(data.is_vegan)
    .bind(data.is_available)
    .bind(data.preparation_time)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create menu item".into()))
}

/// Overwrite the editable columns with an already merged record
pub async fn update(pool: &SqlitePool, item: &MenuItem) -> RepoResult<MenuItem> {
    let rows = sqlx::query(
        "UPDATE menu_items SET name = ?, description = ?, price_cents = ?, category = ?, \
         is_vegetarian = ?, is_vegan = ?, is_available = ?, preparation_time = ?, updated_at = ? \
         WHERE id = ?",
    )
    .bind(&item.name)
    .bind(&item.description)
    .bind(money::to_cents(item.price))
    .bind(&item.category)
    .bind(item.is_vegetarian)
    .bind(item.is_vegan)
    .bind(item.is_available)
    .bind(item.preparation_time)
    .bind(item.updated_at)
    .bind(item.id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Menu item {} not found", item.id)));
    }
    find_by_id(pool, item.id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", item.id)))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM menu_items WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Number of order lines that reference the item
pub async fn count_order_references(pool: &SqlitePool, id: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_items WHERE menu_item_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn delete_by_restaurant(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    restaurant_id: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM menu_items WHERE restaurant_id = ?")
        .bind(restaurant_id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected())
}

/// Items ranked by total quantity ordered across all orders
pub async fn popular(
    pool: &SqlitePool,
    restaurant_id: Option<i64>,
    limit: i64,
) -> RepoResult<Vec<PopularMenuItem>> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT m.id, m.name, m.restaurant_id, \
                SUM(oi.quantity) AS total_ordered, \
                COUNT(oi.id) AS order_count \
         FROM menu_items m JOIN order_items oi ON oi.menu_item_id = m.id",
    );
    if let Some(restaurant_id) = restaurant_id {
        qb.push(" WHERE m.restaurant_id = ").push_bind(restaurant_id);
    }
    qb.push(
        " GROUP BY m.id, m.name, m.restaurant_id \
          ORDER BY total_ordered DESC, m.id LIMIT ",
    )
    .push_bind(limit);

    let items = qb
        .build_query_as::<PopularMenuItem>()
        .fetch_all(pool)
        .await?;
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::restaurant;
    use crate::db::repository::test_support::{menu_item_payload, restaurant_payload, test_pool};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[tokio::test]
    async fn test_price_round_trips_through_cents() {
        let pool = test_pool().await;
        let r = restaurant::create(&pool, &restaurant_payload("Burger Barn", "American"), 0)
            .await
            .unwrap();
        let item = create(&pool, &menu_item_payload(r.id, "Double Burger", "15.99"), 0)
            .await
            .unwrap();
        assert_eq!(item.price, Decimal::from_str("15.99").unwrap());
        assert!(item.is_available);

        let stored: i64 = sqlx::query_scalar("SELECT price_cents FROM menu_items WHERE id = ?")
            .bind(item.id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(stored, 1599);
    }

    #[tokio::test]
    async fn test_unknown_restaurant_is_foreign_key_error() {
        let pool = test_pool().await;
        let err = create(&pool, &menu_item_payload(42, "Ghost Dish", "5.00"), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::ForeignKey(_)));
    }

    #[tokio::test]
    async fn test_search_and_find_by_ids() {
        let pool = test_pool().await;
        let r = restaurant::create(&pool, &restaurant_payload("Green Bowl", "Vegan"), 0)
            .await
            .unwrap();
        let mut salad = menu_item_payload(r.id, "Kale Salad", "9.50");
        salad.category = "Salads".into();
        salad.is_vegetarian = true;
        salad.is_vegan = true;
        let salad = create(&pool, &salad, 0).await.unwrap();
        let mut steak = menu_item_payload(r.id, "Steak Frites", "24.00");
        steak.is_available = false;
        let steak = create(&pool, &steak, 0).await.unwrap();

        let filter = MenuItemSearch {
            category: Some("salad".into()),
            ..Default::default()
        };
        let found = search(&pool, &filter, Page::default()).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, salad.id);

        let filter = MenuItemSearch {
            restaurant_id: Some(r.id),
            is_available: Some(false),
            ..Default::default()
        };
        let found = search(&pool, &filter, Page::default()).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, steak.id);

        let found = find_by_ids(&pool, &[steak.id, salad.id, 999]).await.unwrap();
        assert_eq!(found.len(), 2);
        assert!(find_by_ids(&pool, &[]).await.unwrap().is_empty());
    }
}

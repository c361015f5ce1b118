//! Order Repository
//!
//! Orders and their line items. Amounts are stored as integer cents and
//! converted to `Decimal` when rows are mapped to models.

use super::{Page, RepoError, RepoResult};
use crate::utils::money;
use shared::models::{Order, OrderItem, OrderStatus};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const COLUMNS: &str = "id, customer_id, restaurant_id, order_status, total_amount_cents, \
                       delivery_address, special_instructions, order_date, delivery_time";

const ITEM_COLUMNS: &str =
    "id, order_id, menu_item_id, quantity, item_price_cents, special_requests";

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    customer_id: i64,
    restaurant_id: i64,
    order_status: OrderStatus,
    total_amount_cents: i64,
    delivery_address: String,
    special_instructions: Option<String>,
    order_date: i64,
    delivery_time: Option<i64>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            customer_id: row.customer_id,
            restaurant_id: row.restaurant_id,
            order_status: row.order_status,
            total_amount: money::from_cents(row.total_amount_cents),
            delivery_address: row.delivery_address,
            special_instructions: row.special_instructions,
            order_date: row.order_date,
            delivery_time: row.delivery_time,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: i64,
    order_id: i64,
    menu_item_id: i64,
    quantity: i32,
    item_price_cents: i64,
    special_requests: Option<String>,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: row.id,
            order_id: row.order_id,
            menu_item_id: row.menu_item_id,
            quantity: row.quantity,
            item_price: money::from_cents(row.item_price_cents),
            special_requests: row.special_requests,
        }
    }
}

/// One sold order line joined with its menu item name
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ItemSaleRow {
    pub menu_item_id: i64,
    pub name: String,
    pub quantity: i64,
    pub item_price_cents: i64,
}

/// One customer order joined with its restaurant
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CustomerOrderRow {
    pub order_id: i64,
    pub restaurant_id: i64,
    pub restaurant_name: String,
    pub cuisine_type: String,
    pub order_status: OrderStatus,
    pub total_amount_cents: i64,
}

/// Filters for order listing
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub customer_id: Option<i64>,
    pub restaurant_id: Option<i64>,
    pub status: Option<OrderStatus>,
}

/// New order header, inserted before its lines
#[derive(Debug, Clone)]
pub struct NewOrder<'a> {
    pub customer_id: i64,
    pub restaurant_id: i64,
    pub total_amount_cents: i64,
    pub delivery_address: &'a str,
    pub special_instructions: Option<&'a str>,
    pub order_date: i64,
}

pub async fn find_by_id(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    id: i64,
) -> RepoResult<Option<Order>> {
    let sql = format!("SELECT {COLUMNS} FROM orders WHERE id = ?");
    let row = sqlx::query_as::<_, OrderRow>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(row.map(Into::into))
}

/// Orders matching every given filter, newest first
pub async fn list(pool: &SqlitePool, filter: &OrderFilter, page: Page) -> RepoResult<Vec<Order>> {
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {COLUMNS} FROM orders WHERE 1 = 1"));
    if let Some(customer_id) = filter.customer_id {
        qb.push(" AND customer_id = ").push_bind(customer_id);
    }
    if let Some(restaurant_id) = filter.restaurant_id {
        qb.push(" AND restaurant_id = ").push_bind(restaurant_id);
    }
    if let Some(status) = filter.status {
        qb.push(" AND order_status = ").push_bind(status);
    }
    qb.push(" ORDER BY order_date DESC, id DESC LIMIT ")
        .push_bind(page.limit)
        .push(" OFFSET ")
        .push_bind(page.skip);

    let rows = qb.build_query_as::<OrderRow>().fetch_all(pool).await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn insert(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    order: &NewOrder<'_>,
) -> RepoResult<i64> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO orders (customer_id, restaurant_id, order_status, total_amount_cents, \
         delivery_address, special_instructions, order_date) \
         VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(order.customer_id)
    .bind(order.restaurant_id)
    .bind(OrderStatus::Placed)
    .bind(order.total_amount_cents)
    .bind(order.delivery_address)
    .bind(order.special_instructions)
    .bind(order.order_date)
    .fetch_one(conn)
    .await?;
    Ok(id)
}

pub async fn insert_item(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    order_id: i64,
    menu_item_id: i64,
    quantity: i32,
    item_price_cents: i64,
    special_requests: Option<&str>,
) -> RepoResult<i64> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO order_items (order_id, menu_item_id, quantity, item_price_cents, \
         special_requests) VALUES (?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(order_id)
    .bind(menu_item_id)
    .bind(quantity)
    .bind(item_price_cents)
    .bind(special_requests)
    .fetch_one(conn)
    .await?;
    Ok(id)
}

pub async fn items_for_order(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    order_id: i64,
) -> RepoResult<Vec<OrderItem>> {
    let sql = format!("SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = ? ORDER BY id");
    let rows = sqlx::query_as::<_, OrderItemRow>(&sql)
        .bind(order_id)
        .fetch_all(conn)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Overwrite status and delivery metadata; total and lines never change
pub async fn update(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    order: &Order,
) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE orders SET order_status = ?, delivery_address = ?, special_instructions = ?, \
         delivery_time = ? WHERE id = ?",
    )
    .bind(order.order_status)
    .bind(&order.delivery_address)
    .bind(&order.special_instructions)
    .bind(order.delivery_time)
    .bind(order.id)
    .execute(conn)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {} not found", order.id)));
    }
    Ok(())
}

/// Every order of a restaurant in id order
pub async fn find_by_restaurant(pool: &SqlitePool, restaurant_id: i64) -> RepoResult<Vec<Order>> {
    let sql = format!("SELECT {COLUMNS} FROM orders WHERE restaurant_id = ? ORDER BY id");
    let rows = sqlx::query_as::<_, OrderRow>(&sql)
        .bind(restaurant_id)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Sold lines of a restaurant's orders in order-item id order
pub async fn item_sales_for_restaurant(
    pool: &SqlitePool,
    restaurant_id: i64,
) -> RepoResult<Vec<ItemSaleRow>> {
    let rows = sqlx::query_as::<_, ItemSaleRow>(
        "SELECT oi.menu_item_id, m.name, oi.quantity, oi.item_price_cents \
         FROM order_items oi \
         JOIN orders o ON o.id = oi.order_id \
         JOIN menu_items m ON m.id = oi.menu_item_id \
         WHERE o.restaurant_id = ? \
         ORDER BY oi.id",
    )
    .bind(restaurant_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// A customer's orders with restaurant name and cuisine, in order id order
pub async fn customer_orders_with_restaurant(
    pool: &SqlitePool,
    customer_id: i64,
) -> RepoResult<Vec<CustomerOrderRow>> {
    let rows = sqlx::query_as::<_, CustomerOrderRow>(
        "SELECT o.id AS order_id, o.restaurant_id, r.name AS restaurant_name, r.cuisine_type, \
                o.order_status, o.total_amount_cents \
         FROM orders o JOIN restaurants r ON r.id = o.restaurant_id \
         WHERE o.customer_id = ? \
         ORDER BY o.id",
    )
    .bind(customer_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Cuisines a customer ordered most, ties by first order
pub async fn favorite_cuisines(
    pool: &SqlitePool,
    customer_id: i64,
    limit: i64,
) -> RepoResult<Vec<String>> {
    let cuisines: Vec<String> = sqlx::query_scalar(
        "SELECT r.cuisine_type \
         FROM orders o JOIN restaurants r ON r.id = o.restaurant_id \
         WHERE o.customer_id = ? \
         GROUP BY r.cuisine_type \
         ORDER BY COUNT(o.id) DESC, MIN(o.id) \
         LIMIT ?",
    )
    .bind(customer_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(cuisines)
}

// ── Cascade helpers (run inside the caller's transaction) ───────────

pub async fn delete_items_by_restaurant(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    restaurant_id: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query(
        "DELETE FROM order_items WHERE order_id IN \
         (SELECT id FROM orders WHERE restaurant_id = ?)",
    )
    .bind(restaurant_id)
    .execute(conn)
    .await?;
    Ok(rows.rows_affected())
}

pub async fn delete_by_restaurant(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    restaurant_id: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM orders WHERE restaurant_id = ?")
        .bind(restaurant_id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected())
}

pub async fn delete_items_by_customer(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    customer_id: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query(
        "DELETE FROM order_items WHERE order_id IN \
         (SELECT id FROM orders WHERE customer_id = ?)",
    )
    .bind(customer_id)
    .execute(conn)
    .await?;
    Ok(rows.rows_affected())
}

pub async fn delete_by_customer(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    customer_id: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM orders WHERE customer_id = ?")
        .bind(customer_id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::{
        customer_payload, menu_item_payload, restaurant_payload, test_pool,
    };
    use crate::db::repository::{customer, menu_item, restaurant};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    async fn seed(pool: &SqlitePool) -> (i64, i64, i64) {
        let r = restaurant::create(pool, &restaurant_payload("Curry House", "Indian"), 0)
            .await
            .unwrap();
        let m = menu_item::create(pool, &menu_item_payload(r.id, "Butter Chicken", "12.50"), 0)
            .await
            .unwrap();
        let c = customer::create(pool, &customer_payload("Raj Patel", "raj@example.com"), 0)
            .await
            .unwrap();
        (r.id, m.id, c.id)
    }

    fn header(customer_id: i64, restaurant_id: i64, cents: i64, date: i64) -> NewOrder<'static> {
        NewOrder {
            customer_id,
            restaurant_id,
            total_amount_cents: cents,
            delivery_address: "742 Evergreen Terrace",
            special_instructions: None,
            order_date: date,
        }
    }

    #[tokio::test]
    async fn test_insert_and_read_back() {
        let pool = test_pool().await;
        let (r, m, c) = seed(&pool).await;

        let id = insert(&pool, &header(c, r, 2500, 100)).await.unwrap();
        insert_item(&pool, id, m, 2, 1250, Some("extra spicy"))
            .await
            .unwrap();

        let order = find_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(order.order_status, OrderStatus::Placed);
        assert_eq!(order.total_amount, Decimal::from_str("25.00").unwrap());

        let items = items_for_order(&pool, id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item_price, Decimal::from_str("12.50").unwrap());
        assert_eq!(items[0].special_requests.as_deref(), Some("extra spicy"));
    }

    #[tokio::test]
    async fn test_status_is_stored_as_snake_case_text() {
        let pool = test_pool().await;
        let (r, _, c) = seed(&pool).await;
        let id = insert(&pool, &header(c, r, 100, 0)).await.unwrap();

        let mut order = find_by_id(&pool, id).await.unwrap().unwrap();
        order.order_status = OrderStatus::OutForDelivery;
        update(&pool, &order).await.unwrap();

        let raw: String = sqlx::query_scalar("SELECT order_status FROM orders WHERE id = ?")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(raw, "out_for_delivery");
    }

    #[tokio::test]
    async fn test_list_filters_newest_first() {
        let pool = test_pool().await;
        let (r, _, c) = seed(&pool).await;
        let first = insert(&pool, &header(c, r, 100, 10)).await.unwrap();
        let second = insert(&pool, &header(c, r, 200, 20)).await.unwrap();

        let mut order = find_by_id(&pool, first).await.unwrap().unwrap();
        order.order_status = OrderStatus::Cancelled;
        update(&pool, &order).await.unwrap();

        let all = list(&pool, &OrderFilter::default(), Page::default())
            .await
            .unwrap();
        let ids: Vec<i64> = all.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![second, first]);

        let filter = OrderFilter {
            customer_id: Some(c),
            status: Some(OrderStatus::Cancelled),
            ..Default::default()
        };
        let cancelled = list(&pool, &filter, Page::default()).await.unwrap();
        assert_eq!(cancelled.len(), 1);
        assert_eq!(cancelled[0].id, first);
    }

    #[tokio::test]
    async fn test_update_missing_order() {
        let pool = test_pool().await;
        let order = Order {
            id: 77,
            customer_id: 1,
            restaurant_id: 1,
            order_status: OrderStatus::Confirmed,
            total_amount: Decimal::ZERO,
            delivery_address: "nowhere".into(),
            special_instructions: None,
            order_date: 0,
            delivery_time: None,
        };
        assert!(matches!(
            update(&pool, &order).await.unwrap_err(),
            RepoError::NotFound(_)
        ));
    }
}

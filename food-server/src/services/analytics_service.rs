//! Analytics Service
//!
//! Restaurant and customer summaries, recomputed from orders and reviews on
//! every call. Aggregation is done in plain functions over loaded rows so
//! the arithmetic stays exact (`Decimal`) and testable without a database.
//!
//! Rankings are stable: equal counts keep the order in which the key was
//! first seen (rows arrive in id order).

use std::collections::HashMap;
use std::hash::Hash;

use rust_decimal::Decimal;
use shared::models::{
    CustomerAnalytics, FavoriteCuisine, FavoriteRestaurant, Order, PopularItem,
    RestaurantAnalytics, empty_status_counts,
};
use sqlx::SqlitePool;

use crate::db::repository::order::{CustomerOrderRow, ItemSaleRow};
use crate::db::repository::review::ReviewStats;
use crate::db::repository::{customer, order, restaurant, review};
use crate::utils::money;
use crate::utils::{AppError, AppResult, ErrorCode};

pub const TOP_ITEMS: usize = 10;
pub const TOP_RESTAURANTS: usize = 5;
pub const TOP_CUISINES: usize = 5;

/// Insertion-ordered accumulator keyed by `K`
struct Ranking<K, V> {
    index: HashMap<K, usize>,
    entries: Vec<V>,
}

impl<K: Eq + Hash, V> Ranking<K, V> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    fn entry(&mut self, key: K, init: impl FnOnce() -> V) -> &mut V {
        let Self { index, entries } = self;
        let idx = *index.entry(key).or_insert_with(|| {
            entries.push(init());
            entries.len() - 1
        });
        &mut entries[idx]
    }

    /// Highest scores first, ties in first-seen order
    fn top_by<S: Ord>(mut self, n: usize, score: impl Fn(&V) -> S) -> Vec<V> {
        self.entries.sort_by(|a, b| score(b).cmp(&score(a)));
        self.entries.truncate(n);
        self.entries
    }
}

/// Aggregate a restaurant's orders, sold lines and review stats
pub fn summarize_restaurant(
    restaurant_id: i64,
    orders: &[Order],
    sales: &[ItemSaleRow],
    reviews: ReviewStats,
) -> RestaurantAnalytics {
    let mut orders_by_status = empty_status_counts();
    let mut total_revenue = Decimal::ZERO;
    for o in orders {
        total_revenue += o.total_amount;
        *orders_by_status.entry(o.order_status).or_insert(0) += 1;
    }
    let total_orders = orders.len() as i64;

    let mut items: Ranking<i64, PopularItem> = Ranking::new();
    for sale in sales {
        let item = items.entry(sale.menu_item_id, || PopularItem {
            menu_item_id: sale.menu_item_id,
            name: sale.name.clone(),
            quantity_sold: 0,
            revenue: Decimal::ZERO,
        });
        item.quantity_sold += sale.quantity;
        item.revenue += money::from_cents(sale.item_price_cents) * Decimal::from(sale.quantity);
    }

    RestaurantAnalytics {
        restaurant_id,
        total_orders,
        total_revenue,
        average_order_value: money::average(total_revenue, total_orders),
        average_rating: reviews.average_rating,
        total_reviews: reviews.total_reviews,
        popular_items: items.top_by(TOP_ITEMS, |i| i.quantity_sold),
        orders_by_status,
    }
}

/// Aggregate a customer's orders joined with their restaurants
pub fn summarize_customer(customer_id: i64, rows: &[CustomerOrderRow]) -> CustomerAnalytics {
    let mut orders_by_status = empty_status_counts();
    let mut total_spent = Decimal::ZERO;
    let mut restaurants: Ranking<i64, FavoriteRestaurant> = Ranking::new();
    let mut cuisines: Ranking<String, FavoriteCuisine> = Ranking::new();

    for row in rows {
        let amount = money::from_cents(row.total_amount_cents);
        total_spent += amount;
        *orders_by_status.entry(row.order_status).or_insert(0) += 1;

        let fav = restaurants.entry(row.restaurant_id, || FavoriteRestaurant {
            restaurant_id: row.restaurant_id,
            name: row.restaurant_name.clone(),
            order_count: 0,
            total_spent: Decimal::ZERO,
        });
        fav.order_count += 1;
        fav.total_spent += amount;

        cuisines
            .entry(row.cuisine_type.clone(), || FavoriteCuisine {
                cuisine_type: row.cuisine_type.clone(),
                order_count: 0,
            })
            .order_count += 1;
    }
    let total_orders = rows.len() as i64;

    CustomerAnalytics {
        customer_id,
        total_orders,
        total_spent,
        average_order_value: money::average(total_spent, total_orders),
        favorite_restaurants: restaurants.top_by(TOP_RESTAURANTS, |r| r.order_count),
        favorite_cuisines: cuisines.top_by(TOP_CUISINES, |c| c.order_count),
        orders_by_status,
    }
}

pub async fn restaurant_analytics(
    pool: &SqlitePool,
    restaurant_id: i64,
) -> AppResult<RestaurantAnalytics> {
    restaurant::find_by_id(pool, restaurant_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))?;

    let orders = order::find_by_restaurant(pool, restaurant_id).await?;
    let sales = order::item_sales_for_restaurant(pool, restaurant_id).await?;
    let reviews = review::stats_for_restaurant(pool, restaurant_id).await?;

    Ok(summarize_restaurant(restaurant_id, &orders, &sales, reviews))
}

pub async fn customer_analytics(pool: &SqlitePool, customer_id: i64) -> AppResult<CustomerAnalytics> {
    customer::find_by_id(pool, customer_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CustomerNotFound))?;

    let rows = order::customer_orders_with_restaurant(pool, customer_id).await?;
    Ok(summarize_customer(customer_id, &rows))
}

//! Analytics Models
//!
//! Computed per request from orders and reviews; never persisted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::OrderStatus;

/// Order counts keyed by status, every status present
pub type StatusCounts = BTreeMap<OrderStatus, i64>;

/// Zero-filled status counts
pub fn empty_status_counts() -> StatusCounts {
    OrderStatus::ALL.into_iter().map(|s| (s, 0)).collect()
}

/// Restaurant performance summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantAnalytics {
    pub restaurant_id: i64,
    pub total_orders: i64,
    pub total_revenue: Decimal,
    pub average_order_value: Decimal,
    pub average_rating: f64,
    pub total_reviews: i64,
    /// Top items by quantity sold
    pub popular_items: Vec<PopularItem>,
    pub orders_by_status: StatusCounts,
}

/// Item sales within one restaurant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularItem {
    pub menu_item_id: i64,
    pub name: String,
    pub quantity_sold: i64,
    pub revenue: Decimal,
}

/// Customer ordering summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerAnalytics {
    pub customer_id: i64,
    pub total_orders: i64,
    pub total_spent: Decimal,
    pub average_order_value: Decimal,
    pub favorite_restaurants: Vec<FavoriteRestaurant>,
    pub favorite_cuisines: Vec<FavoriteCuisine>,
    pub orders_by_status: StatusCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteRestaurant {
    pub restaurant_id: i64,
    pub name: String,
    pub order_count: i64,
    pub total_spent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteCuisine {
    pub cuisine_type: String,
    pub order_count: i64,
}

/// Restaurant ranked by recent order volume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingRestaurant {
    pub id: i64,
    pub name: String,
    pub cuisine_type: String,
    pub rating: f64,
    pub recent_orders: i64,
    pub recent_revenue: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_status_counts_cover_every_status() {
        let counts = empty_status_counts();
        assert_eq!(counts.len(), 6);
        assert!(counts.values().all(|&n| n == 0));

        let json = serde_json::to_value(&counts).unwrap();
        assert_eq!(json["out_for_delivery"], 0);
        assert_eq!(json["placed"], 0);
    }
}

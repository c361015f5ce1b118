//! Menu Item Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Restaurant;

/// Menu item entity
///
/// Price is stored as integer cents; the repository layer converts rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: i64,
    pub restaurant_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: String,
    pub is_vegetarian: bool,
    /// Vegan implies vegetarian
    pub is_vegan: bool,
    pub is_available: bool,
    /// Minutes, 1-300
    pub preparation_time: Option<i32>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create menu item payload
///
/// `restaurant_id` is taken from the path when created under a restaurant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    #[serde(default)]
    pub restaurant_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: String,
    #[serde(default)]
    pub is_vegetarian: bool,
    #[serde(default)]
    pub is_vegan: bool,
    #[serde(default = "default_true")]
    pub is_available: bool,
    pub preparation_time: Option<i32>,
}

fn default_true() -> bool {
    true
}

/// Update menu item payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
    pub is_vegetarian: Option<bool>,
    pub is_vegan: Option<bool>,
    pub is_available: Option<bool>,
    pub preparation_time: Option<i32>,
}

/// Menu item with its owning restaurant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemWithRestaurant {
    #[serde(flatten)]
    pub menu_item: MenuItem,
    pub restaurant: Restaurant,
}

/// Menu item ranked by total quantity ordered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PopularMenuItem {
    pub id: i64,
    pub name: String,
    pub restaurant_id: i64,
    pub total_ordered: i64,
    /// Number of order lines referencing the item
    pub order_count: i64,
}

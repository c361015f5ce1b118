//! Restaurant Model

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::MenuItem;

/// Restaurant entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub cuisine_type: String,
    pub address: String,
    pub phone_number: String,
    /// Mean of all review ratings, 0.0 without reviews
    pub rating: f64,
    pub is_active: bool,
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create restaurant payload
///
/// Rating is derived from reviews and cannot be supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantCreate {
    pub name: String,
    pub description: Option<String>,
    pub cuisine_type: String,
    pub address: String,
    pub phone_number: String,
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
}

/// Update restaurant payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestaurantUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub cuisine_type: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub is_active: Option<bool>,
    pub opening_time: Option<NaiveTime>,
    pub closing_time: Option<NaiveTime>,
}

/// Restaurant with its full menu
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantWithMenu {
    #[serde(flatten)]
    pub restaurant: Restaurant,
    pub menu_items: Vec<MenuItem>,
}

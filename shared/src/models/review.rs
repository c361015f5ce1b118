//! Review Model

use serde::{Deserialize, Serialize};

/// Review entity (one per order and customer)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Review {
    pub id: i64,
    pub customer_id: i64,
    pub restaurant_id: i64,
    pub order_id: i64,
    /// 1-5 stars
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: i64,
}

/// Create review payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewCreate {
    pub rating: i32,
    pub comment: Option<String>,
}

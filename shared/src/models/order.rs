//! Order Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{Customer, MenuItem, Restaurant};

/// Order status
///
/// Orders start as `Placed` and move forward one step at a time until
/// `Delivered`; any non-terminal order may be `Cancelled`.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum OrderStatus {
    #[default]
    Placed,
    Confirmed,
    Preparing,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Every status in workflow order
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Placed,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Statuses reachable from this one in a single step
    pub fn allowed_transitions(&self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Placed => &[OrderStatus::Confirmed, OrderStatus::Cancelled],
            OrderStatus::Confirmed => &[OrderStatus::Preparing, OrderStatus::Cancelled],
            OrderStatus::Preparing => &[OrderStatus::OutForDelivery, OrderStatus::Cancelled],
            OrderStatus::OutForDelivery => &[OrderStatus::Delivered, OrderStatus::Cancelled],
            OrderStatus::Delivered | OrderStatus::Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "placed",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::OutForDelivery => "out_for_delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an unknown status string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidOrderStatus(pub String);

impl fmt::Display for InvalidOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid order status: {}", self.0)
    }
}

impl std::error::Error for InvalidOrderStatus {}

impl FromStr for OrderStatus {
    type Err = InvalidOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| InvalidOrderStatus(s.to_string()))
    }
}

/// Order entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    pub restaurant_id: i64,
    pub order_status: OrderStatus,
    /// Sum of line snapshots, fixed at creation
    pub total_amount: Decimal,
    pub delivery_address: String,
    pub special_instructions: Option<String>,
    pub order_date: i64,
    pub delivery_time: Option<i64>,
}

/// Order line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub menu_item_id: i64,
    /// 1-50
    pub quantity: i32,
    /// Unit price snapshot at order time
    pub item_price: Decimal,
    pub special_requests: Option<String>,
}

/// Order line input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemCreate {
    pub menu_item_id: i64,
    pub quantity: i32,
    pub special_requests: Option<String>,
}

/// Place order payload (customer comes from the path)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub restaurant_id: i64,
    pub delivery_address: String,
    pub special_instructions: Option<String>,
    pub items: Vec<OrderItemCreate>,
}

/// Update order payload
///
/// Total and line items are immutable; only status and delivery metadata change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderUpdate {
    #[serde(alias = "status")]
    pub order_status: Option<OrderStatus>,
    pub delivery_address: Option<String>,
    pub special_instructions: Option<String>,
    pub delivery_time: Option<i64>,
}

/// Freshly placed order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedOrder {
    #[serde(flatten)]
    pub order: Order,
    pub order_items: Vec<OrderItem>,
    pub estimated_delivery_minutes: i64,
}

/// Order line with the menu item it references
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemDetail {
    #[serde(flatten)]
    pub item: OrderItem,
    pub menu_item: MenuItem,
}

/// Order with customer, restaurant and lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub customer: Customer,
    pub restaurant: Restaurant,
    pub order_items: Vec<OrderItemDetail>,
}

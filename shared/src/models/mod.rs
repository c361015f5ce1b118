//! Data models
//!
//! Shared between food-server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), timestamps are Unix millis.
//! Monetary fields are `rust_decimal::Decimal` and serialize as strings.

pub mod analytics;
pub mod customer;
pub mod menu_item;
pub mod order;
pub mod restaurant;
pub mod review;

// Re-exports
pub use analytics::*;
pub use customer::*;
pub use menu_item::*;
pub use order::*;
pub use restaurant::*;
pub use review::*;

//! Business services
//!
//! - [`catalog_service`] - restaurants and menu items
//! - [`customer_service`] - customers and recommendations
//! - [`order_service`] - order placement and status workflow
//! - [`review_service`] - reviews and restaurant ratings
//! - [`analytics_service`] - restaurant and customer analytics
//!
//! Services are free async functions over a `SqlitePool`; multi-step writes
//! run in a single transaction.

pub mod analytics_service;
pub mod catalog_service;
pub mod customer_service;
pub mod order_service;
pub mod review_service;

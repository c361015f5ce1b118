//! API routes
//!
//! - [`health`] - health check
//! - [`restaurants`] - restaurants, their menus, reviews and orders
//! - [`menu_items`] - menu items
//! - [`customers`] - customers, order placement and recommendations
//! - [`orders`] - order lookup and status workflow
//! - [`reviews`] - reviews of delivered orders
//! - [`analytics`] - restaurant and customer analytics
//! - [`cache`] - response cache administration

pub mod extract;
pub mod pagination;

pub mod analytics;
pub mod cache;
pub mod customers;
pub mod health;
pub mod menu_items;
pub mod orders;
pub mod restaurants;
pub mod reviews;

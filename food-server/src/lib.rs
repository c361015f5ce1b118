//! Food Server - food delivery backend
//!
//! Restaurants, menus, customers, orders with a status workflow, reviews
//! that drive restaurant ratings, and analytics, served over HTTP.
//!
//! # Module structure
//!
//! ```text
//! food-server/src/
//! ├── core/          # configuration, state, server
//! ├── api/           # HTTP handlers
//! ├── routes/        # router assembly and middleware
//! ├── services/      # business rules and transactions
//! ├── db/            # SQLite pool and repositories
//! ├── cache/         # response cache
//! └── utils/         # logging, validation, money
//! ```

pub mod api;
pub mod cache;
pub mod core;
pub mod db;
pub mod routes;
pub mod services;
pub mod utils;

pub use core::{Config, Server, ServerState};
pub use routes::{build_app, build_router};
pub use utils::logger::init_logger;
pub use utils::{ApiResponse, AppError, AppResult, ErrorCode};

//! Utility module - shared helpers and re-exported error types
//!
//! - [`AppError`] / [`ApiResponse`] (from shared::error)
//! - logging setup, input validation and money arithmetic

pub mod logger;
pub mod money;
pub mod validation;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};

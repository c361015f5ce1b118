//! Types shared by the food delivery server and its clients
//!
//! Error codes and response bodies, the domain models and their
//! create/update payloads, and a few time helpers.

pub mod error;
pub mod models;
pub mod util;

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};

//! Error stack shared by every handler
//!
//! A failure is an [`AppError`]: an [`ErrorCode`] plus a message and
//! optional details. It renders as an [`ApiResponse`] body with the status
//! the code maps to.
//!
//! ```
//! use shared::error::{ApiResponse, AppError, ErrorCode};
//!
//! let err = AppError::invalid_order("Menu item 4 is not available")
//!     .with_detail("menu_item_id", 4);
//! assert_eq!(err.http_status(), 400);
//!
//! let body = ApiResponse::from(&err);
//! assert_eq!(body.code, ErrorCode::OrderInvalid.code());
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};

//! HTTP status for each error code

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Missing records (and inactive customers) are 404, server faults are
    /// 500, everything else the client can correct is 400. Uniqueness
    /// conflicts are included in the 400 group.
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,
            Self::NotFound
            | Self::OrderNotFound
            | Self::RestaurantNotFound
            | Self::MenuItemNotFound
            | Self::CustomerNotFound
            | Self::CustomerInactive => StatusCode::NOT_FOUND,
            _ if self.category() == ErrorCategory::System => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

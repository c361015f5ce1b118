//! Numeric error codes
//!
//! Codes are grouped by the thousands digit:
//! - 0xxx: request-level failures
//! - 4xxx: orders
//! - 5xxx: reviews
//! - 6xxx: catalog (6001.. restaurants, 6101.. menu items)
//! - 7xxx: customers
//! - 9xxx: server faults

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every failure a client can see, as a stable `u16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    Success = 0,
    ValidationFailed = 2,
    NotFound = 3,
    AlreadyExists = 4,
    InvalidRequest = 5,

    OrderNotFound = 4001,
    /// Unknown, foreign or unavailable items, malformed quantities
    OrderInvalid = 4002,
    OrderEmpty = 4003,
    OrderInvalidTransition = 4004,

    /// Order missing, placed by someone else, or not delivered yet
    ReviewNotAllowed = 5001,
    ReviewAlreadyExists = 5002,

    RestaurantNotFound = 6001,
    RestaurantNameExists = 6002,
    MenuItemNotFound = 6101,
    /// Still referenced by order lines
    MenuItemInUse = 6102,
    MenuItemInvalidPrice = 6103,
    /// Vegan but not vegetarian
    MenuItemDietaryConflict = 6104,

    CustomerNotFound = 7001,
    CustomerEmailExists = 7002,
    CustomerInactive = 7003,

    InternalError = 9001,
    DatabaseError = 9002,
}

impl ErrorCode {
    /// All codes, in numeric order.
    pub const ALL: [ErrorCode; 22] = [
        Self::Success,
        Self::ValidationFailed,
        Self::NotFound,
        Self::AlreadyExists,
        Self::InvalidRequest,
        Self::OrderNotFound,
        Self::OrderInvalid,
        Self::OrderEmpty,
        Self::OrderInvalidTransition,
        Self::ReviewNotAllowed,
        Self::ReviewAlreadyExists,
        Self::RestaurantNotFound,
        Self::RestaurantNameExists,
        Self::MenuItemNotFound,
        Self::MenuItemInUse,
        Self::MenuItemInvalidPrice,
        Self::MenuItemDietaryConflict,
        Self::CustomerNotFound,
        Self::CustomerEmailExists,
        Self::CustomerInactive,
        Self::InternalError,
        Self::DatabaseError,
    ];

    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Default client-facing message, used when no specific one is given
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Success => "OK",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",

            Self::OrderNotFound => "Order not found",
            Self::OrderInvalid => "Order request is invalid",
            Self::OrderEmpty => "Order must contain at least one item",
            Self::OrderInvalidTransition => "Order status transition is not allowed",

            Self::ReviewNotAllowed => {
                "Order not found, doesn't belong to customer, or not completed"
            }
            Self::ReviewAlreadyExists => "Review already exists for this order",

            Self::RestaurantNotFound => "Restaurant not found",
            Self::RestaurantNameExists => "Restaurant with this name already exists",
            Self::MenuItemNotFound => "Menu item not found",
            Self::MenuItemInUse => "Menu item is referenced by existing orders",
            Self::MenuItemInvalidPrice => "Price must be positive with at most 2 decimal places",
            Self::MenuItemDietaryConflict => "Vegan items must also be vegetarian",

            Self::CustomerNotFound => "Customer not found",
            Self::CustomerEmailExists => "Customer with this email already exists",
            Self::CustomerInactive => "Customer account is inactive",

            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// A `u16` that names no [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown error code {0}")]
pub struct InvalidErrorCode(pub u16);

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|c| c.code() == value)
            .ok_or(InvalidErrorCode(value))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::OrderInvalidTransition.code(), 4004);
        assert_eq!(ErrorCode::ReviewAlreadyExists.code(), 5002);
        assert_eq!(ErrorCode::RestaurantNameExists.code(), 6002);
        assert_eq!(ErrorCode::CustomerEmailExists.code(), 7002);
        assert_eq!(ErrorCode::DatabaseError.code(), 9002);
    }

    #[test]
    fn all_is_sorted_and_resolves() {
        assert!(ErrorCode::ALL.windows(2).all(|w| w[0].code() < w[1].code()));
        for code in ErrorCode::ALL {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
        assert_eq!(ErrorCode::try_from(1234), Err(InvalidErrorCode(1234)));
    }

    #[test]
    fn serializes_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::OrderInvalid).unwrap(), "4002");
        let code: ErrorCode = serde_json::from_str("7001").unwrap();
        assert_eq!(code, ErrorCode::CustomerNotFound);
        assert!(serde_json::from_str::<ErrorCode>("4242").is_err());
        assert_eq!(ErrorCode::ReviewNotAllowed.to_string(), "5001");
    }
}

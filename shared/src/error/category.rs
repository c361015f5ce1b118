//! Error categories, derived from the thousands digit of a code

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// 0xxx
    Request,
    /// 4xxx
    Order,
    /// 5xxx
    Review,
    /// 6xxx
    Catalog,
    /// 7xxx
    Customer,
    /// 9xxx and anything unassigned
    System,
}

impl From<u16> for ErrorCategory {
    fn from(code: u16) -> Self {
        match code / 1000 {
            0 => Self::Request,
            4 => Self::Order,
            5 => Self::Review,
            6 => Self::Catalog,
            7 => Self::Customer,
            _ => Self::System,
        }
    }
}

impl ErrorCode {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_follows_thousands_digit() {
        assert_eq!(ErrorCategory::from(999), ErrorCategory::Request);
        assert_eq!(ErrorCategory::from(10_000), ErrorCategory::System);
        assert_eq!(ErrorCode::OrderEmpty.category(), ErrorCategory::Order);
        assert_eq!(ErrorCode::ReviewNotAllowed.category(), ErrorCategory::Review);
        assert_eq!(ErrorCode::MenuItemInUse.category(), ErrorCategory::Catalog);
        assert_eq!(ErrorCode::CustomerInactive.category(), ErrorCategory::Customer);
        assert_eq!(ErrorCode::DatabaseError.category(), ErrorCategory::System);
    }

    #[test]
    fn category_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorCategory::Catalog).unwrap();
        assert_eq!(json, "\"catalog\"");
    }
}

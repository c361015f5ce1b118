//! skip/limit query parameters

use serde::Deserialize;

use crate::db::repository::Page;
use crate::utils::{AppError, AppResult};

pub const DEFAULT_LIMIT: i64 = 100;
/// Upper bound for restaurant and menu listings
pub const CATALOG_MAX_LIMIT: i64 = 1000;
/// Upper bound for orders, reviews and customers
pub const RECORD_MAX_LIMIT: i64 = 500;

/// Plain `?skip=&limit=` query
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl PageQuery {
    pub fn page(&self, max_limit: i64) -> AppResult<Page> {
        page(self.skip, self.limit, max_limit)
    }
}

/// Validate skip/limit against `max_limit` and build a [`Page`]
pub fn page(skip: Option<i64>, limit: Option<i64>, max_limit: i64) -> AppResult<Page> {
    let skip = skip.unwrap_or(0);
    if skip < 0 {
        return Err(AppError::validation(format!(
            "skip must be greater than or equal to 0, got {skip}"
        )));
    }
    let limit = limit.unwrap_or(DEFAULT_LIMIT);
    if !(1..=max_limit).contains(&limit) {
        return Err(AppError::validation(format!(
            "limit must be between 1 and {max_limit}, got {limit}"
        )));
    }
    Ok(Page::new(skip, limit))
}

/// Validate an optional bounded integer query parameter
pub fn bounded(
    value: Option<i64>,
    field: &str,
    default: i64,
    min: i64,
    max: i64,
) -> AppResult<i64> {
    let value = value.unwrap_or(default);
    if !(min..=max).contains(&value) {
        return Err(AppError::validation(format!(
            "{field} must be between {min} and {max}, got {value}"
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::ErrorCode;

    #[test]
    fn test_page_defaults_and_bounds() {
        assert_eq!(PageQuery::default().page(CATALOG_MAX_LIMIT).unwrap(), Page::new(0, 100));
        assert_eq!(page(Some(20), Some(1000), CATALOG_MAX_LIMIT).unwrap(), Page::new(20, 1000));

        let err = page(Some(-1), None, CATALOG_MAX_LIMIT).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(page(None, Some(0), RECORD_MAX_LIMIT).is_err());
        assert!(page(None, Some(501), RECORD_MAX_LIMIT).is_err());
    }

    #[test]
    fn test_bounded() {
        assert_eq!(bounded(None, "days", 7, 1, 30).unwrap(), 7);
        assert_eq!(bounded(Some(30), "days", 7, 1, 30).unwrap(), 30);
        let err = bounded(Some(31), "days", 7, 1, 30).unwrap_err();
        assert!(err.message.contains("days"));
    }
}

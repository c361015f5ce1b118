//! Input validation helpers
//!
//! Centralized text length constants and validation functions shared by
//! the catalog, customer, order and review services. Lengths count chars.

use chrono::NaiveTime;

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Restaurant and menu item names
pub const MIN_NAME_LEN: usize = 3;
pub const MAX_NAME_LEN: usize = 100;

/// Customer names
pub const MIN_PERSON_NAME_LEN: usize = 2;

/// Cuisine types and menu categories
pub const MAX_LABEL_LEN: usize = 50;

/// Street addresses
pub const MIN_ADDRESS_LEN: usize = 5;
pub const MAX_ADDRESS_LEN: usize = 500;

/// Phone numbers (formatted text, digits counted separately)
pub const MIN_PHONE_LEN: usize = 10;
pub const MAX_PHONE_LEN: usize = 20;
pub const MIN_PHONE_DIGITS: usize = 10;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Descriptions, instructions, special requests
pub const MAX_NOTE_LEN: usize = 1000;

/// Review comments
pub const MAX_COMMENT_LEN: usize = 1000;

/// Preparation time in minutes
pub const MIN_PREPARATION_MINUTES: i32 = 1;
pub const MAX_PREPARATION_MINUTES: i32 = 300;

/// Review rating bounds
pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-blank and within `min..=max` chars.
pub fn validate_required_text(
    value: &str,
    field: &str,
    min_len: usize,
    max_len: usize,
) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    let len = value.chars().count();
    if len < min_len {
        return Err(AppError::validation(format!(
            "{field} is too short ({len} chars, min {min_len})"
        )));
    }
    if len > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.chars().count()
        )));
    }
    Ok(())
}

/// Validate a phone number: 10-20 chars containing at least 10 digits.
pub fn validate_phone(value: &str) -> Result<(), AppError> {
    validate_required_text(value, "phone_number", MIN_PHONE_LEN, MAX_PHONE_LEN)?;
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    if digits < MIN_PHONE_DIGITS {
        return Err(AppError::validation(
            "Phone number must contain at least 10 digits",
        ));
    }
    Ok(())
}

/// Validate an email address (`local@domain.tld`, tld of 2+ letters).
pub fn validate_email(value: &str) -> Result<(), AppError> {
    let invalid = || AppError::validation(format!("Invalid email address: {value}"));

    if value.len() > MAX_EMAIL_LEN {
        return Err(invalid());
    }
    let (local, domain) = value.split_once('@').ok_or_else(invalid)?;
    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c));
    let (host, tld) = domain.rsplit_once('.').ok_or_else(invalid)?;
    let host_ok = !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    let tld_ok = tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic());

    if local_ok && host_ok && tld_ok {
        Ok(())
    } else {
        Err(invalid())
    }
}

/// Validate that closing time is strictly after opening time.
pub fn validate_opening_hours(opening: NaiveTime, closing: NaiveTime) -> Result<(), AppError> {
    if closing <= opening {
        return Err(AppError::validation(
            "Closing time must be after opening time",
        ));
    }
    Ok(())
}

/// Validate an optional preparation time in minutes.
pub fn validate_preparation_time(value: Option<i32>) -> Result<(), AppError> {
    if let Some(minutes) = value
        && !(MIN_PREPARATION_MINUTES..=MAX_PREPARATION_MINUTES).contains(&minutes)
    {
        return Err(AppError::validation(format!(
            "preparation_time must be between {MIN_PREPARATION_MINUTES} and {MAX_PREPARATION_MINUTES} minutes, got {minutes}"
        )));
    }
    Ok(())
}

/// Validate dietary flags: vegan items must also be vegetarian.
pub fn validate_dietary_flags(is_vegetarian: bool, is_vegan: bool) -> Result<(), AppError> {
    if is_vegan && !is_vegetarian {
        return Err(AppError::new(crate::utils::ErrorCode::MenuItemDietaryConflict));
    }
    Ok(())
}

/// Validate a review rating (1-5 stars).
pub fn validate_rating(rating: i32) -> Result<(), AppError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(AppError::validation(format!(
            "rating must be between {MIN_RATING} and {MAX_RATING}, got {rating}"
        )));
    }
    Ok(())
}

//! Money calculation utilities using rust_decimal for precision
//!
//! Amounts are `Decimal` in the domain and integer cents in SQLite.
//! Line totals and order totals are summed exactly; only averages round.

use rust_decimal::prelude::*;

use super::AppError;

/// Monetary scale (cents)
pub const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed unit price
pub const MAX_PRICE: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

/// Allowed quantity per order line
pub const MIN_QUANTITY: i32 = 1;
pub const MAX_QUANTITY: i32 = 50;

/// Decimal value of integer cents
#[inline]
pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, DECIMAL_PLACES)
}

/// Integer cents of a validated amount
///
/// Amounts with more than two decimals are rounded half away from zero.
pub fn to_cents(amount: Decimal) -> i64 {
    let mut rounded =
        amount.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(DECIMAL_PLACES);
    i64::try_from(rounded.mantissa()).unwrap_or(if rounded.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}

/// Validate a unit price: positive, at most two decimals, bounded
pub fn validate_price(price: Decimal) -> Result<(), AppError> {
    if price <= Decimal::ZERO {
        return Err(AppError::validation(format!(
            "price must be positive, got {price}"
        )));
    }
    if price.normalize().scale() > DECIMAL_PLACES {
        return Err(AppError::validation(format!(
            "price must have at most {DECIMAL_PLACES} decimal places, got {price}"
        )));
    }
    if price > MAX_PRICE {
        return Err(AppError::validation(format!(
            "price exceeds maximum allowed ({MAX_PRICE}), got {price}"
        )));
    }
    Ok(())
}

/// Whether a line quantity is within 1..=50
#[inline]
pub fn quantity_in_range(quantity: i32) -> bool {
    (MIN_QUANTITY..=MAX_QUANTITY).contains(&quantity)
}

/// Unit price times quantity, exact
#[inline]
pub fn line_total(unit_price: Decimal, quantity: i32) -> Decimal {
    unit_price * Decimal::from(quantity)
}

/// Total divided by count, rounded to cents; zero when count is zero
pub fn average(total: Decimal, count: i64) -> Decimal {
    if count <= 0 {
        return Decimal::ZERO;
    }
    (total / Decimal::from(count))
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_cents_conversion() {
        assert_eq!(from_cents(5097), dec("50.97"));
        assert_eq!(to_cents(dec("50.97")), 5097);
        assert_eq!(to_cents(dec("15")), 1500);
        assert_eq!(to_cents(dec("0.1")), 10);
        assert_eq!(to_cents(dec("0.005")), 1);
    }

    #[test]
    fn test_line_totals_are_exact() {
        let total = line_total(dec("15.99"), 2) + line_total(dec("18.99"), 1);
        assert_eq!(total, dec("50.97"));

        // 0.1 * 3 has no float drift
        assert_eq!(line_total(dec("0.10"), 3), dec("0.30"));
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(dec("12.50")).is_ok());
        assert!(validate_price(dec("12.500")).is_ok());
        assert!(validate_price(dec("0")).is_err());
        assert!(validate_price(dec("-1.00")).is_err());
        assert!(validate_price(dec("1.999")).is_err());
        assert!(validate_price(dec("100000.01")).is_err());
    }

    #[test]
    fn test_quantity_range() {
        assert!(!quantity_in_range(0));
        assert!(quantity_in_range(1));
        assert!(quantity_in_range(50));
        assert!(!quantity_in_range(51));
    }

    #[test]
    fn test_average() {
        assert_eq!(average(dec("0"), 0), Decimal::ZERO);
        assert_eq!(average(dec("50.97"), 1), dec("50.97"));
        assert_eq!(average(dec("100.00"), 3), dec("33.33"));
        assert_eq!(average(dec("0.05"), 2), dec("0.03"));
    }
}

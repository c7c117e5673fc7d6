//! Input-boundary checks shared by the calculators.
//!
//! Form fields arrive as text; anything that is not a finite decimal is
//! rejected here so that no calculator ever sees a malformed number.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;

use crate::error::MortgageError;
use crate::types::Money;
use crate::MortgageResult;

/// Longest amortization the engine accepts, in years.
pub const MAX_AMORTIZATION_YEARS: u32 = 30;

/// Highest annual interest rate accepted, in percent.
pub const MAX_ANNUAL_RATE_PCT: Decimal = dec!(100);

/// Largest price, loan or cost accepted. Keeps every product and sum in the
/// engine well inside Decimal's range.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000);

/// Parse a form field into a Decimal, naming the field on failure.
///
/// Accepts surrounding whitespace, thousands separators and a leading `$`.
/// Empty input is an error rather than zero.
pub fn parse_decimal_field(field: &str, text: &str) -> MortgageResult<Decimal> {
    let cleaned: String = text
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();

    if cleaned.is_empty() {
        return Err(MortgageError::validation(field, "Value is required"));
    }

    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map_err(|_| MortgageError::validation(field, format!("'{}' is not a number", text.trim())))
}

/// Convert an `f64` (e.g. from a JS number) into a Decimal, rejecting NaN and infinities.
pub fn decimal_from_f64(field: &str, value: f64) -> MortgageResult<Decimal> {
    if !value.is_finite() {
        return Err(MortgageError::validation(field, "Value must be a finite number"));
    }
    Decimal::try_from(value)
        .map_err(|_| MortgageError::validation(field, "Value is out of range"))
}

pub(crate) fn require_non_negative(field: &str, value: Decimal) -> MortgageResult<()> {
    if value < Decimal::ZERO {
        return Err(MortgageError::validation(field, "Must not be negative"));
    }
    Ok(())
}

fn require_at_most_max_amount(field: &str, value: Money) -> MortgageResult<()> {
    if value > MAX_AMOUNT {
        return Err(MortgageError::validation(
            field,
            format!("Must not exceed {MAX_AMOUNT}"),
        ));
    }
    Ok(())
}

/// A money amount in `0..=MAX_AMOUNT`.
pub fn require_amount(field: &str, value: Money) -> MortgageResult<()> {
    require_non_negative(field, value)?;
    require_at_most_max_amount(field, value)
}

/// A money amount in `(0, MAX_AMOUNT]`.
pub(crate) fn require_positive(field: &str, value: Money) -> MortgageResult<()> {
    if value <= Decimal::ZERO {
        return Err(MortgageError::validation(field, "Must be positive"));
    }
    require_at_most_max_amount(field, value)
}

pub(crate) fn require_annual_rate(field: &str, annual_rate_pct: Decimal) -> MortgageResult<()> {
    require_non_negative(field, annual_rate_pct)?;
    if annual_rate_pct > MAX_ANNUAL_RATE_PCT {
        return Err(MortgageError::validation(
            field,
            format!("Rate must not exceed {MAX_ANNUAL_RATE_PCT}%"),
        ));
    }
    Ok(())
}

pub(crate) fn require_amortization_years(field: &str, years: u32) -> MortgageResult<()> {
    if !(1..=MAX_AMORTIZATION_YEARS).contains(&years) {
        return Err(MortgageError::validation(
            field,
            format!("Amortization must be between 1 and {MAX_AMORTIZATION_YEARS} years"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_and_formatted() {
        assert_eq!(parse_decimal_field("price", "596000").unwrap(), dec!(596000));
        assert_eq!(parse_decimal_field("price", " $596,000.50 ").unwrap(), dec!(596000.50));
        assert_eq!(parse_decimal_field("rate", "3.99").unwrap(), dec!(3.99));
    }

    #[test]
    fn test_parse_empty_field_is_rejected() {
        let err = parse_decimal_field("home_price", "   ").unwrap_err();
        assert_eq!(err.field(), Some("home_price"));
    }

    #[test]
    fn test_parse_garbage_is_rejected() {
        let err = parse_decimal_field("annual_rate_pct", "NaN").unwrap_err();
        assert_eq!(err.field(), Some("annual_rate_pct"));
        assert!(parse_decimal_field("x", "12abc").is_err());
    }

    #[test]
    fn test_f64_boundary() {
        assert!(decimal_from_f64("rate", f64::NAN).is_err());
        assert!(decimal_from_f64("rate", f64::INFINITY).is_err());
        assert_eq!(decimal_from_f64("rate", 5.0).unwrap(), dec!(5));
    }

    #[test]
    fn test_rate_ceiling() {
        assert!(require_annual_rate("annual_rate_pct", dec!(100)).is_ok());
        let err = require_annual_rate("annual_rate_pct", dec!(300)).unwrap_err();
        assert_eq!(err.field(), Some("annual_rate_pct"));
        assert!(require_annual_rate("annual_rate_pct", dec!(-0.01)).is_err());
    }

    #[test]
    fn test_amount_ceiling() {
        assert!(require_amount("principal", MAX_AMOUNT).is_ok());
        assert!(require_amount("principal", Decimal::ZERO).is_ok());
        assert!(require_amount("principal", MAX_AMOUNT + Decimal::ONE).is_err());
        assert!(require_positive("home_price", Decimal::ZERO).is_err());
        assert!(require_positive("home_price", Decimal::MAX).is_err());
    }

    #[test]
    fn test_amortization_range() {
        assert!(require_amortization_years("years", 0).is_err());
        assert!(require_amortization_years("years", 31).is_err());
        assert!(require_amortization_years("years", 1).is_ok());
        assert!(require_amortization_years("years", 30).is_ok());
    }
}

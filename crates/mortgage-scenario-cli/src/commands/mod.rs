pub mod insurance;
pub mod land_transfer;
pub mod payment;
pub mod scenario;

use mortgage_scenario_core::validation::parse_decimal_field;
use mortgage_scenario_core::MortgageError;
use rust_decimal::Decimal;

/// clap value parser for money and percentage flags; accepts `$596,000`.
pub fn decimal_arg(s: &str) -> Result<Decimal, MortgageError> {
    parse_decimal_field("value", s)
}

use rust_decimal::Decimal;

use crate::config::{InsuranceTier, RateTable};
use crate::types::{Money, Percent, Rate};

/// Mortgage-default-insurance premium under the default rate table.
///
/// Tiers are inclusive and evaluated highest first: 20%+ down pays nothing,
/// 15% pays 2.80% of the loan, 10% pays 3.10%, anything lower 4.00%.
/// No range checks happen here; see `ScenarioInput::validate`.
pub fn compute_insurance_premium(down_payment_pct: Percent, loan_amount: Money) -> Money {
    compute_insurance_premium_with(&RateTable::default(), down_payment_pct, loan_amount)
}

/// Insurance premium using the tiers of an explicit rate table.
pub fn compute_insurance_premium_with(
    table: &RateTable,
    down_payment_pct: Percent,
    loan_amount: Money,
) -> Money {
    loan_amount * premium_rate_for(&table.sorted_insurance_tiers(), down_payment_pct)
}

/// Premium rate (fraction of the loan) for a down-payment percentage.
///
/// `tiers` must be ordered highest threshold first. A percentage below every
/// tier falls through to the last one.
pub fn premium_rate_for(tiers: &[InsuranceTier], down_payment_pct: Percent) -> Rate {
    tiers
        .iter()
        .find(|t| down_payment_pct >= t.min_down_payment_pct)
        .or(tiers.last())
        .map(|t| t.premium_rate)
        .unwrap_or(Decimal::ZERO)
}

/// Whether a down payment this size needs default insurance at all.
pub fn requires_insurance(table: &RateTable, down_payment_pct: Percent) -> bool {
    !premium_rate_for(&table.sorted_insurance_tiers(), down_payment_pct).is_zero()
}

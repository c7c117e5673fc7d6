use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MortgageError;
use crate::types::{Money, Percent, Rate};
use crate::validation::{require_amortization_years, require_amount, require_annual_rate};
use crate::MortgageResult;

// ---------------------------------------------------------------------------
// Payment frequency
// ---------------------------------------------------------------------------

/// How often the borrower pays. Accelerated variants split the monthly
/// payment evenly, which pays the loan down faster than the exact
/// annualised conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum PaymentFrequency {
    Weekly,
    AcceleratedWeekly,
    BiWeekly,
    AcceleratedBiWeekly,
    Monthly,
    SemiMonthly,
    Quarterly,
    Annually,
}

impl PaymentFrequency {
    pub const ALL: [PaymentFrequency; 8] = [
        PaymentFrequency::Weekly,
        PaymentFrequency::AcceleratedWeekly,
        PaymentFrequency::BiWeekly,
        PaymentFrequency::AcceleratedBiWeekly,
        PaymentFrequency::Monthly,
        PaymentFrequency::SemiMonthly,
        PaymentFrequency::Quarterly,
        PaymentFrequency::Annually,
    ];

    /// Convert a monthly payment into the payment due at this frequency.
    pub fn from_monthly(self, monthly: Money) -> Money {
        match self {
            PaymentFrequency::Weekly => monthly * dec!(12) / dec!(52),
            PaymentFrequency::AcceleratedWeekly => monthly / dec!(4),
            PaymentFrequency::BiWeekly => monthly * dec!(12) / dec!(26),
            PaymentFrequency::AcceleratedBiWeekly => monthly / dec!(2),
            PaymentFrequency::SemiMonthly => monthly / dec!(2),
            PaymentFrequency::Monthly => monthly,
            PaymentFrequency::Quarterly => monthly * dec!(3),
            PaymentFrequency::Annually => monthly * dec!(12),
        }
    }

    pub fn payments_per_year(self) -> u32 {
        match self {
            PaymentFrequency::Weekly | PaymentFrequency::AcceleratedWeekly => 52,
            PaymentFrequency::BiWeekly | PaymentFrequency::AcceleratedBiWeekly => 26,
            PaymentFrequency::Monthly => 12,
            PaymentFrequency::SemiMonthly => 24,
            PaymentFrequency::Quarterly => 4,
            PaymentFrequency::Annually => 1,
        }
    }
}

impl fmt::Display for PaymentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaymentFrequency::Weekly => "Weekly",
            PaymentFrequency::AcceleratedWeekly => "Accelerated Weekly",
            PaymentFrequency::BiWeekly => "Bi-Weekly",
            PaymentFrequency::AcceleratedBiWeekly => "Accelerated Bi-Weekly",
            PaymentFrequency::Monthly => "Monthly",
            PaymentFrequency::SemiMonthly => "Semi-Monthly",
            PaymentFrequency::Quarterly => "Quarterly",
            PaymentFrequency::Annually => "Annually",
        };
        f.write_str(s)
    }
}

impl FromStr for PaymentFrequency {
    type Err = MortgageError;

    /// Accepts snake_case, kebab-case, CamelCase and display names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();

        match key.as_str() {
            "weekly" => Ok(PaymentFrequency::Weekly),
            "acceleratedweekly" => Ok(PaymentFrequency::AcceleratedWeekly),
            "biweekly" => Ok(PaymentFrequency::BiWeekly),
            "acceleratedbiweekly" => Ok(PaymentFrequency::AcceleratedBiWeekly),
            "monthly" => Ok(PaymentFrequency::Monthly),
            "semimonthly" => Ok(PaymentFrequency::SemiMonthly),
            "quarterly" => Ok(PaymentFrequency::Quarterly),
            "annually" | "annual" | "yearly" => Ok(PaymentFrequency::Annually),
            _ => Err(MortgageError::validation(
                "payment_frequency",
                format!("Unrecognised payment frequency '{s}'"),
            )),
        }
    }
}

impl TryFrom<String> for PaymentFrequency {
    type Error = MortgageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Payment formulas
// ---------------------------------------------------------------------------

/// Monthly rate (fraction) from an annual percentage: 3.99 -> 0.003325.
pub fn monthly_rate(annual_rate_pct: Percent) -> Rate {
    annual_rate_pct / dec!(100) / dec!(12)
}

/// (1 + r)^n via iterative multiplication. `None` when the power leaves
/// Decimal's range.
pub(crate) fn compound_factor(rate: Rate, periods: u32) -> Option<Decimal> {
    let one_plus_r = Decimal::ONE.checked_add(rate)?;
    let mut compound = Decimal::ONE;
    for _ in 0..periods {
        compound = compound.checked_mul(one_plus_r)?;
    }
    Some(compound)
}

fn rate_overflow() -> MortgageError {
    MortgageError::validation(
        "annual_rate_pct",
        "Rate is too high to amortize over this term",
    )
}

pub(crate) fn validate_loan_terms(
    principal: Money,
    annual_rate_pct: Percent,
    years: u32,
) -> MortgageResult<()> {
    require_amount("principal", principal)?;
    require_annual_rate("annual_rate_pct", annual_rate_pct)?;
    require_amortization_years("years", years)
}

/// Standard fixed-rate monthly payment: P * r(1+r)^n / ((1+r)^n - 1)
///
/// A zero rate falls back to straight-line repayment, `P / n`.
pub fn compute_monthly_payment(
    principal: Money,
    annual_rate_pct: Percent,
    years: u32,
) -> MortgageResult<Money> {
    validate_loan_terms(principal, annual_rate_pct, years)?;
    monthly_payment_unchecked(principal, monthly_rate(annual_rate_pct), years * 12)
}

pub(crate) fn monthly_payment_unchecked(
    principal: Money,
    monthly_rate: Rate,
    total_months: u32,
) -> MortgageResult<Money> {
    if total_months == 0 {
        return Err(MortgageError::DivisionByZero {
            context: "monthly payment over zero months".into(),
        });
    }

    if monthly_rate.is_zero() {
        return Ok(principal / Decimal::from(total_months));
    }

    let compound = compound_factor(monthly_rate, total_months).ok_or_else(rate_overflow)?;
    let denominator = compound - Decimal::ONE;

    if denominator.is_zero() {
        return Err(MortgageError::DivisionByZero {
            context: "mortgage payment denominator".into(),
        });
    }

    let numerator = principal
        .checked_mul(monthly_rate)
        .and_then(|p| p.checked_mul(compound))
        .ok_or_else(rate_overflow)?;
    Ok(numerator / denominator)
}

/// Payment due at `frequency`, derived from the monthly payment.
pub fn compute_periodic_payment(
    principal: Money,
    annual_rate_pct: Percent,
    years: u32,
    frequency: PaymentFrequency,
) -> MortgageResult<Money> {
    let monthly = compute_monthly_payment(principal, annual_rate_pct, years)?;
    Ok(frequency.from_monthly(monthly))
}

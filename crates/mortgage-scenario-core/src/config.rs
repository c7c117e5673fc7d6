use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::MortgageError;
use crate::types::{Money, Percent, Rate};
use crate::validation::require_amount;
use crate::MortgageResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One mortgage-default-insurance tier. Applies when the down payment is at
/// least `min_down_payment_pct` (inclusive).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsuranceTier {
    pub min_down_payment_pct: Percent,
    /// Premium as a fraction of the loan amount
    pub premium_rate: Rate,
}

/// A marginal tax bracket: `rate` applies to the slice of the price above
/// `threshold` up to the next bracket's threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub threshold: Money,
    pub rate: Rate,
}

/// A complete land-transfer-tax layer (provincial or municipal).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandTransferSchedule {
    /// Brackets in ascending threshold order, the first starting at zero
    pub brackets: Vec<TaxBracket>,
    /// Maximum first-time-buyer rebate against this layer
    pub first_time_buyer_rebate_cap: Money,
}

/// A municipal layer and the municipality that levies it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MunicipalSchedule {
    /// Matched case-insensitively against free-text locations
    pub municipality: String,
    pub schedule: LandTransferSchedule,
}

/// Every jurisdiction-specific constant the engine uses.
///
/// `RateTable::default()` carries the Ontario / City of Toronto figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateTable {
    /// Highest tier first is not required; tiers are sorted on use
    pub insurance_tiers: Vec<InsuranceTier>,
    /// Sales tax charged on the insurance premium at closing
    pub premium_sales_tax_rate: Rate,
    /// Down payments below this percentage draw a warning
    pub minimum_down_payment_pct: Percent,
    /// Longest amortization an insured mortgage normally allows
    pub max_insured_amortization_years: u32,
    pub provincial: LandTransferSchedule,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub municipal: Option<MunicipalSchedule>,
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn ontario_brackets() -> Vec<TaxBracket> {
    vec![
        TaxBracket { threshold: dec!(0), rate: dec!(0.005) },
        TaxBracket { threshold: dec!(55000), rate: dec!(0.01) },
        TaxBracket { threshold: dec!(250000), rate: dec!(0.015) },
        TaxBracket { threshold: dec!(400000), rate: dec!(0.02) },
        TaxBracket { threshold: dec!(2000000), rate: dec!(0.025) },
    ]
}

impl Default for RateTable {
    fn default() -> Self {
        RateTable {
            insurance_tiers: vec![
                InsuranceTier { min_down_payment_pct: dec!(20), premium_rate: dec!(0) },
                InsuranceTier { min_down_payment_pct: dec!(15), premium_rate: dec!(0.028) },
                InsuranceTier { min_down_payment_pct: dec!(10), premium_rate: dec!(0.031) },
                InsuranceTier { min_down_payment_pct: dec!(0), premium_rate: dec!(0.04) },
            ],
            premium_sales_tax_rate: dec!(0.08),
            minimum_down_payment_pct: dec!(5),
            max_insured_amortization_years: 25,
            provincial: LandTransferSchedule {
                brackets: ontario_brackets(),
                first_time_buyer_rebate_cap: dec!(4000),
            },
            municipal: Some(MunicipalSchedule {
                municipality: "Toronto".into(),
                schedule: LandTransferSchedule {
                    brackets: ontario_brackets(),
                    first_time_buyer_rebate_cap: dec!(4475),
                },
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

impl RateTable {
    /// Check structural soundness of a table loaded from configuration.
    pub fn validate(&self) -> MortgageResult<()> {
        if self.insurance_tiers.is_empty() {
            return Err(MortgageError::validation(
                "insurance_tiers",
                "At least one insurance tier is required",
            ));
        }
        if !self
            .insurance_tiers
            .iter()
            .any(|t| t.min_down_payment_pct.is_zero())
        {
            return Err(MortgageError::validation(
                "insurance_tiers",
                "A tier starting at 0% down payment is required",
            ));
        }
        for tier in &self.insurance_tiers {
            if tier.min_down_payment_pct < Decimal::ZERO {
                return Err(MortgageError::validation(
                    "insurance_tiers",
                    "Tier thresholds must not be negative",
                ));
            }
            require_fraction("insurance_tiers", tier.premium_rate)?;
        }
        require_fraction("premium_sales_tax_rate", self.premium_sales_tax_rate)?;

        self.provincial.validate("provincial")?;
        if let Some(m) = &self.municipal {
            if m.municipality.trim().is_empty() {
                return Err(MortgageError::validation(
                    "municipal.municipality",
                    "Municipality name must not be empty",
                ));
            }
            m.schedule.validate("municipal")?;
        }
        Ok(())
    }

    /// Insurance tiers ordered from the highest down-payment threshold down.
    pub fn sorted_insurance_tiers(&self) -> Vec<InsuranceTier> {
        let mut tiers = self.insurance_tiers.clone();
        tiers.sort_by(|a, b| b.min_down_payment_pct.cmp(&a.min_down_payment_pct));
        tiers
    }
}

impl LandTransferSchedule {
    fn validate(&self, layer: &str) -> MortgageResult<()> {
        let field = format!("{layer}.brackets");
        let first = self
            .brackets
            .first()
            .ok_or_else(|| MortgageError::validation(&field, "At least one bracket is required"))?;
        if !first.threshold.is_zero() {
            return Err(MortgageError::validation(
                &field,
                "First bracket must start at zero",
            ));
        }
        for pair in self.brackets.windows(2) {
            if pair[1].threshold <= pair[0].threshold {
                return Err(MortgageError::validation(
                    &field,
                    "Bracket thresholds must be strictly ascending",
                ));
            }
        }
        for bracket in &self.brackets {
            require_fraction(&field, bracket.rate)?;
            require_amount(&field, bracket.threshold)?;
        }
        require_amount(
            &format!("{layer}.first_time_buyer_rebate_cap"),
            self.first_time_buyer_rebate_cap,
        )
    }
}

/// A rate expressed as a fraction, between 0 and 1 inclusive.
fn require_fraction(field: &str, rate: Rate) -> MortgageResult<()> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(MortgageError::validation(field, "Rate must be between 0 and 1"));
    }
    Ok(())
}

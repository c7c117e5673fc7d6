//! Monthly carrying cost and cash required at closing.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::land_transfer::LandTransferTaxResult;
use crate::types::{Money, Rate};
use crate::validation::require_amount;
use crate::MortgageResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Recurring ownership costs besides the mortgage itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarryingCostInput {
    pub annual_property_tax: Money,
    pub monthly_condo_fees: Money,
    pub monthly_home_insurance: Money,
    pub monthly_utilities: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarryingCost {
    pub mortgage_payment: Money,
    pub property_tax: Money,
    pub condo_fees: Money,
    pub home_insurance: Money,
    pub utilities: Money,
    pub total_monthly: Money,
}

/// One-off costs paid on closing day besides the down payment and taxes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClosingCostInput {
    pub legal_fees: Money,
    pub title_insurance: Money,
    pub other_costs: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashToClose {
    pub down_payment: Money,
    pub land_transfer_tax: Money,
    /// Sales tax on the insurance premium; the premium itself is financed
    pub premium_sales_tax: Money,
    pub legal_fees: Money,
    pub title_insurance: Money,
    pub other_costs: Money,
    pub total: Money,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

impl CarryingCostInput {
    pub fn validate(&self) -> MortgageResult<()> {
        require_amount("annual_property_tax", self.annual_property_tax)?;
        require_amount("monthly_condo_fees", self.monthly_condo_fees)?;
        require_amount("monthly_home_insurance", self.monthly_home_insurance)?;
        require_amount("monthly_utilities", self.monthly_utilities)
    }
}

impl ClosingCostInput {
    pub fn validate(&self) -> MortgageResult<()> {
        require_amount("legal_fees", self.legal_fees)?;
        require_amount("title_insurance", self.title_insurance)?;
        require_amount("other_costs", self.other_costs)
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Total monthly cost of owning the home on a given mortgage payment.
pub fn compute_carrying_cost(monthly_payment: Money, costs: &CarryingCostInput) -> CarryingCost {
    let property_tax = costs.annual_property_tax / dec!(12);
    let total_monthly = monthly_payment
        + property_tax
        + costs.monthly_condo_fees
        + costs.monthly_home_insurance
        + costs.monthly_utilities;

    CarryingCost {
        mortgage_payment: monthly_payment,
        property_tax,
        condo_fees: costs.monthly_condo_fees,
        home_insurance: costs.monthly_home_insurance,
        utilities: costs.monthly_utilities,
        total_monthly,
    }
}

/// Cash the buyer must bring on closing day.
pub fn compute_cash_to_close(
    down_payment: Money,
    insurance_premium: Money,
    land_transfer: &LandTransferTaxResult,
    costs: &ClosingCostInput,
    premium_sales_tax_rate: Rate,
) -> CashToClose {
    let premium_sales_tax = insurance_premium * premium_sales_tax_rate;
    let land_transfer_tax = land_transfer.net_payable.max(Decimal::ZERO);
    let total = down_payment
        + land_transfer_tax
        + premium_sales_tax
        + costs.legal_fees
        + costs.title_insurance
        + costs.other_costs;

    CashToClose {
        down_payment,
        land_transfer_tax,
        premium_sales_tax,
        legal_fees: costs.legal_fees,
        title_insurance: costs.title_insurance,
        other_costs: costs.other_costs,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ltt(net: Money) -> LandTransferTaxResult {
        LandTransferTaxResult {
            provincial_tax: net,
            municipal_tax: Decimal::ZERO,
            municipal_tax_applies: false,
            rebate: Decimal::ZERO,
            net_payable: net,
        }
    }

    #[test]
    fn test_carrying_cost_rollup() {
        let costs = CarryingCostInput {
            annual_property_tax: dec!(3600),
            monthly_condo_fees: dec!(450),
            monthly_home_insurance: dec!(80),
            monthly_utilities: dec!(170),
        };
        let c = compute_carrying_cost(dec!(2500), &costs);
        assert_eq!(c.property_tax, dec!(300));
        assert_eq!(c.total_monthly, dec!(3500));
    }

    #[test]
    fn test_carrying_cost_defaults_to_payment() {
        let c = compute_carrying_cost(dec!(1234.56), &CarryingCostInput::default());
        assert_eq!(c.total_monthly, dec!(1234.56));
    }

    #[test]
    fn test_cash_to_close_insured() {
        let costs = ClosingCostInput {
            legal_fees: dec!(1500),
            title_insurance: dec!(300),
            other_costs: dec!(200),
        };
        let c = compute_cash_to_close(dec!(29800), dec!(22648), &ltt(dec!(8395)), &costs, dec!(0.08));
        assert_eq!(c.premium_sales_tax, dec!(1811.84));
        assert_eq!(c.total, dec!(29800) + dec!(8395) + dec!(1811.84) + dec!(2000));
    }

    #[test]
    fn test_negative_costs_rejected() {
        let costs = CarryingCostInput {
            monthly_utilities: dec!(-1),
            ..Default::default()
        };
        assert_eq!(costs.validate().unwrap_err().field(), Some("monthly_utilities"));
    }
}

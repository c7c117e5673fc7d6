use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::closing::{
    compute_carrying_cost, compute_cash_to_close, CarryingCost, CarryingCostInput, CashToClose,
    ClosingCostInput,
};
use crate::config::RateTable;
use crate::land_transfer::{compute_land_transfer_tax_for, Jurisdiction, LandTransferTaxResult};
use crate::scenario::{ScenarioInput, ScenarioResult, ScenarioSet};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::MortgageResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Everything needed to compare financing scenarios for one purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseAnalysisInput {
    pub home_price: Money,
    pub scenarios: Vec<ScenarioInput>,
    /// Free-text location, e.g. the listing address
    #[serde(default)]
    pub location: String,
    /// Explicit jurisdiction; takes precedence over `location`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<Jurisdiction>,
    #[serde(default)]
    pub is_first_time_buyer: bool,
    #[serde(default)]
    pub carrying_costs: CarryingCostInput,
    #[serde(default)]
    pub closing_costs: ClosingCostInput,
    /// Jurisdiction constants; defaults to Ontario / Toronto
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_table: Option<RateTable>,
}

/// One scenario with its monthly and closing-day cash needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioAnalysis {
    #[serde(flatten)]
    pub scenario: ScenarioResult,
    pub carrying_cost: CarryingCost,
    pub cash_to_close: CashToClose,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseAnalysisOutput {
    pub home_price: Money,
    pub jurisdiction: Jurisdiction,
    /// Independent of financing, so shared by every scenario
    pub land_transfer_tax: LandTransferTaxResult,
    pub scenarios: Vec<ScenarioAnalysis>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compare every financing scenario for a purchase: insurance, payments,
/// amortization, land transfer tax, carrying cost and cash to close.
pub fn analyse_purchase(
    input: &PurchaseAnalysisInput,
) -> MortgageResult<ComputationOutput<PurchaseAnalysisOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let default_table;
    let table = match &input.rate_table {
        Some(t) => {
            t.validate()?;
            t
        }
        None => {
            default_table = RateTable::default();
            &default_table
        }
    };

    input.carrying_costs.validate()?;
    input.closing_costs.validate()?;

    let set = ScenarioSet::new(input.home_price, input.scenarios.clone())?;
    let results = set.compute_with(table)?;

    let jurisdiction = input
        .jurisdiction
        .clone()
        .unwrap_or_else(|| Jurisdiction::detect(&input.location, table));
    let land_transfer_tax = compute_land_transfer_tax_for(
        input.home_price,
        input.is_first_time_buyer,
        &jurisdiction,
        table,
    )?;

    let scenarios = set
        .scenarios()
        .iter()
        .zip(results)
        .map(|(scenario_input, scenario)| {
            collect_warnings(table, scenario_input, &scenario, &mut warnings);
            let carrying_cost = compute_carrying_cost(scenario.monthly_payment, &input.carrying_costs);
            let cash_to_close = compute_cash_to_close(
                scenario.down_payment_amount,
                scenario.insurance_premium,
                &land_transfer_tax,
                &input.closing_costs,
                table.premium_sales_tax_rate,
            );
            ScenarioAnalysis {
                scenario,
                carrying_cost,
                cash_to_close,
            }
        })
        .collect();

    let output = PurchaseAnalysisOutput {
        home_price: input.home_price,
        jurisdiction,
        land_transfer_tax,
        scenarios,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Mortgage scenario comparison (monthly-compounded amortization, tiered default insurance, marginal land transfer tax)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

fn collect_warnings(
    table: &RateTable,
    input: &ScenarioInput,
    scenario: &ScenarioResult,
    warnings: &mut Vec<String>,
) {
    let name = input
        .label
        .clone()
        .unwrap_or_else(|| format!("{}% down", input.down_payment_pct));

    if input.down_payment_pct < table.minimum_down_payment_pct {
        warnings.push(format!(
            "{name}: down payment below the {}% minimum",
            table.minimum_down_payment_pct
        ));
    }

    if !scenario.insurance_premium.is_zero() {
        warnings.push(format!(
            "{name}: mortgage default insurance of {:.2} added to the loan",
            scenario.insurance_premium
        ));
        if input.amortization_years > table.max_insured_amortization_years {
            warnings.push(format!(
                "{name}: {}-year amortization exceeds the {}-year limit for insured mortgages",
                input.amortization_years, table.max_insured_amortization_years
            ));
        }
    }

    if input.annual_rate_pct > dec!(15) {
        warnings.push(format!(
            "{name}: interest rate {}% is unusually high",
            input.annual_rate_pct
        ));
    }
}

use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use mortgage_scenario_core::config::RateTable;
use mortgage_scenario_core::land_transfer::Jurisdiction;
use mortgage_scenario_core::payment::PaymentFrequency;
use mortgage_scenario_core::scenario::{ScenarioInput, ScenarioSet};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn rate_table(table: Option<RateTable>) -> NapiResult<RateTable> {
    let table = table.unwrap_or_default();
    table.validate().map_err(to_napi_error)?;
    Ok(table)
}

// ---------------------------------------------------------------------------
// Request shapes
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct PremiumRequest {
    down_payment_pct: Decimal,
    loan_amount: Decimal,
    #[serde(default)]
    rate_table: Option<RateTable>,
}

#[derive(Deserialize)]
struct LoanRequest {
    principal: Decimal,
    annual_rate_pct: Decimal,
    years: u32,
    #[serde(default = "monthly")]
    frequency: PaymentFrequency,
}

fn monthly() -> PaymentFrequency {
    PaymentFrequency::Monthly
}

#[derive(Deserialize)]
struct LandTransferRequest {
    purchase_price: Decimal,
    #[serde(default)]
    is_first_time_buyer: bool,
    #[serde(default)]
    location: String,
    #[serde(default)]
    jurisdiction: Option<Jurisdiction>,
    #[serde(default)]
    rate_table: Option<RateTable>,
}

#[derive(Deserialize)]
struct ScenarioRequest {
    home_price: Decimal,
    scenario: ScenarioInput,
    #[serde(default)]
    rate_table: Option<RateTable>,
}

#[derive(Deserialize)]
struct CompareRequest {
    home_price: Decimal,
    scenarios: Vec<ScenarioInput>,
    #[serde(default)]
    rate_table: Option<RateTable>,
}

// ---------------------------------------------------------------------------
// Calculators
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_insurance_premium(input_json: String) -> NapiResult<String> {
    let input: PremiumRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let table = rate_table(input.rate_table)?;
    let premium = mortgage_scenario_core::insurance::compute_insurance_premium_with(
        &table,
        input.down_payment_pct,
        input.loan_amount,
    );
    serde_json::to_string(&premium).map_err(to_napi_error)
}

#[napi]
pub fn compute_periodic_payment(input_json: String) -> NapiResult<String> {
    let input: LoanRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let payment = mortgage_scenario_core::payment::compute_periodic_payment(
        input.principal,
        input.annual_rate_pct,
        input.years,
        input.frequency,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&payment).map_err(to_napi_error)
}

#[napi]
pub fn generate_amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: LoanRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let rows = mortgage_scenario_core::amortization::generate_amortization_schedule(
        input.principal,
        input.annual_rate_pct,
        input.years,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&rows).map_err(to_napi_error)
}

#[napi]
pub fn compute_land_transfer_tax(input_json: String) -> NapiResult<String> {
    let input: LandTransferRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let table = rate_table(input.rate_table)?;
    let jurisdiction = input
        .jurisdiction
        .unwrap_or_else(|| Jurisdiction::detect(&input.location, &table));
    let output = mortgage_scenario_core::land_transfer::compute_land_transfer_tax_for(
        input.purchase_price,
        input.is_first_time_buyer,
        &jurisdiction,
        &table,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_scenario(input_json: String) -> NapiResult<String> {
    let input: ScenarioRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let table = rate_table(input.rate_table)?;
    let output =
        mortgage_scenario_core::scenario::compute_scenario_with(&table, input.home_price, &input.scenario)
            .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_scenarios(input_json: String) -> NapiResult<String> {
    let input: CompareRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let table = rate_table(input.rate_table)?;
    let set = ScenarioSet::new(input.home_price, input.scenarios).map_err(to_napi_error)?;
    let output = set.compute_with(&table).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn analyse_purchase(input_json: String) -> NapiResult<String> {
    let input: mortgage_scenario_core::analysis::PurchaseAnalysisInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        mortgage_scenario_core::analysis::analyse_purchase(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Convert a form field to a decimal string, rejecting blanks and non-numbers.
#[napi]
pub fn parse_amount(field: String, text: String) -> NapiResult<String> {
    let value = mortgage_scenario_core::validation::parse_decimal_field(&field, &text)
        .map_err(to_napi_error)?;
    Ok(value.to_string())
}

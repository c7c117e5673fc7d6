use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use serde_json::{json, Value};

use mortgage_scenario_core::analysis::{analyse_purchase, PurchaseAnalysisInput};
use mortgage_scenario_core::config::RateTable;
use mortgage_scenario_core::payment::PaymentFrequency;
use mortgage_scenario_core::scenario::{compute_scenario_with, ScenarioInput, ScenarioSet};

use super::decimal_arg;
use crate::input;

/// Arguments for a single financing scenario
#[derive(Args)]
pub struct ScenarioArgs {
    /// Home price
    #[arg(long, value_parser = decimal_arg)]
    pub home_price: Option<Decimal>,

    /// Down payment in percent of the price
    #[arg(long, value_parser = decimal_arg, conflicts_with = "down_payment_amount")]
    pub down_payment_pct: Option<Decimal>,

    /// Down payment as an amount; converted to a percentage of the price
    #[arg(long, value_parser = decimal_arg)]
    pub down_payment_amount: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 3.99)
    #[arg(long, alias = "rate", value_parser = decimal_arg)]
    pub annual_rate_pct: Option<Decimal>,

    /// Amortization period in years (1-30)
    #[arg(long, default_value = "25")]
    pub years: u32,

    /// Payment frequency (monthly, bi-weekly, accelerated-weekly, ...)
    #[arg(long, default_value = "monthly")]
    pub frequency: PaymentFrequency,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a side-by-side comparison at one price
#[derive(Args)]
pub struct CompareArgs {
    /// Home price
    #[arg(long, value_parser = decimal_arg)]
    pub home_price: Decimal,

    /// Annual interest rate in percent (e.g. 3.99)
    #[arg(long, alias = "rate", value_parser = decimal_arg)]
    pub annual_rate_pct: Decimal,

    /// Amortization period in years (1-30)
    #[arg(long, default_value = "25")]
    pub years: u32,

    /// Down payment percentages to compare
    #[arg(long, value_delimiter = ',', default_value = "5,10,15,20", value_parser = decimal_arg)]
    pub down_payment_pcts: Vec<Decimal>,

    /// Payment frequency (monthly, bi-weekly, accelerated-weekly, ...)
    #[arg(long, default_value = "monthly")]
    pub frequency: PaymentFrequency,
}

/// Arguments for the full purchase analysis
#[derive(Args)]
pub struct AnalyseArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Deserialize)]
struct ScenarioRequest {
    home_price: Decimal,
    #[serde(flatten)]
    scenario: ScenarioInput,
}

pub fn run_scenario(
    args: ScenarioArgs,
    table: &RateTable,
) -> Result<Value, Box<dyn std::error::Error>> {
    let req: ScenarioRequest = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(req) = input::stdin::read_stdin()? {
        req
    } else {
        let home_price = args
            .home_price
            .ok_or("--home-price is required (or provide --input)")?;
        let annual_rate_pct = args
            .annual_rate_pct
            .ok_or("--annual-rate-pct is required (or provide --input)")?;
        let mut scenario = ScenarioInput::new(dec!(20), args.years, annual_rate_pct, args.frequency);
        match (args.down_payment_pct, args.down_payment_amount) {
            (Some(pct), _) => scenario.set_down_payment_pct(pct)?,
            (None, Some(amount)) => scenario.set_down_payment_amount(home_price, amount)?,
            (None, None) => {
                return Err("--down-payment-pct or --down-payment-amount is required".into())
            }
        }
        ScenarioRequest {
            home_price,
            scenario,
        }
    };

    let result = compute_scenario_with(table, req.home_price, &req.scenario)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_compare(args: CompareArgs, table: &RateTable) -> Result<Value, Box<dyn std::error::Error>> {
    let scenarios = args
        .down_payment_pcts
        .iter()
        .map(|pct| {
            ScenarioInput::new(*pct, args.years, args.annual_rate_pct, args.frequency)
                .with_label(format!("{pct}% down"))
        })
        .collect();
    let set = ScenarioSet::new(args.home_price, scenarios)?;
    let results = set.compute_with(table)?;

    let rows: Vec<Value> = results
        .iter()
        .map(|r| {
            json!({
                "label": r.label,
                "down_payment_pct": r.down_payment_pct,
                "down_payment_amount": r.down_payment_amount,
                "insurance_premium": r.insurance_premium,
                "financed_principal": r.financed_principal,
                "monthly_payment": r.monthly_payment,
                "payment_frequency": r.payment_frequency,
                "periodic_payment": r.periodic_payment,
                "total_interest": r.total_interest,
            })
        })
        .collect();
    Ok(Value::Array(rows))
}

pub fn run_analyse(args: AnalyseArgs, table: &RateTable) -> Result<Value, Box<dyn std::error::Error>> {
    let mut analysis_input: PurchaseAnalysisInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(req) = input::stdin::read_stdin()? {
        req
    } else {
        return Err("--input <file.json> or stdin required for purchase analysis".into());
    };

    if analysis_input.rate_table.is_none() {
        analysis_input.rate_table = Some(table.clone());
    }

    let result = analyse_purchase(&analysis_input)?;
    Ok(serde_json::to_value(result)?)
}

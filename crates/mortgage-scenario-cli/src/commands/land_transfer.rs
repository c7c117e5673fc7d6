use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use mortgage_scenario_core::config::RateTable;
use mortgage_scenario_core::land_transfer::{compute_land_transfer_tax_for, Jurisdiction};

use super::decimal_arg;
use crate::input;

/// Arguments for land transfer tax
#[derive(Args)]
pub struct LandTransferArgs {
    /// Purchase price
    #[arg(long, alias = "price", value_parser = decimal_arg)]
    pub purchase_price: Option<Decimal>,

    /// Buyer qualifies for first-time-buyer rebates
    #[arg(long)]
    pub first_time_buyer: bool,

    /// Property location, e.g. "Toronto, ON"
    #[arg(long, default_value = "")]
    pub location: String,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
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
}

pub fn run_land_transfer_tax(
    args: LandTransferArgs,
    table: &RateTable,
) -> Result<Value, Box<dyn std::error::Error>> {
    let req: LandTransferRequest = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(req) = input::stdin::read_stdin()? {
        req
    } else {
        LandTransferRequest {
            purchase_price: args
                .purchase_price
                .ok_or("--purchase-price is required (or provide --input)")?,
            is_first_time_buyer: args.first_time_buyer,
            location: args.location,
            jurisdiction: None,
        }
    };

    let jurisdiction = req
        .jurisdiction
        .unwrap_or_else(|| Jurisdiction::detect(&req.location, table));
    let result = compute_land_transfer_tax_for(
        req.purchase_price,
        req.is_first_time_buyer,
        &jurisdiction,
        table,
    )?;
    Ok(serde_json::to_value(result)?)
}

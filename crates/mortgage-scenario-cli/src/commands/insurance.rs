use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use mortgage_scenario_core::config::RateTable;
use mortgage_scenario_core::insurance::{compute_insurance_premium_with, premium_rate_for};
use mortgage_scenario_core::validation::require_amount;

use super::decimal_arg;

/// Arguments for the default-insurance premium
#[derive(Args)]
pub struct PremiumArgs {
    /// Down payment as a percentage of the price (e.g. 5 for 5%)
    #[arg(long, value_parser = decimal_arg)]
    pub down_payment_pct: Decimal,

    /// Amount borrowed before insurance
    #[arg(long, value_parser = decimal_arg, conflicts_with = "home_price")]
    pub loan_amount: Option<Decimal>,

    /// Home price; the loan is the price less the down payment
    #[arg(long, value_parser = decimal_arg)]
    pub home_price: Option<Decimal>,
}

pub fn run_premium(args: PremiumArgs, table: &RateTable) -> Result<Value, Box<dyn std::error::Error>> {
    if !(Decimal::ZERO..dec!(100)).contains(&args.down_payment_pct) {
        return Err("--down-payment-pct must be at least 0 and below 100".into());
    }
    let loan_amount = match (args.loan_amount, args.home_price) {
        (Some(loan), _) => {
            require_amount("loan_amount", loan)?;
            loan
        }
        (None, Some(price)) => {
            require_amount("home_price", price)?;
            price - price * args.down_payment_pct / dec!(100)
        }
        (None, None) => return Err("--loan-amount or --home-price is required".into()),
    };

    let premium_rate = premium_rate_for(&table.sorted_insurance_tiers(), args.down_payment_pct);
    let insurance_premium =
        compute_insurance_premium_with(table, args.down_payment_pct, loan_amount);

    Ok(json!({
        "down_payment_pct": args.down_payment_pct,
        "loan_amount": loan_amount,
        "premium_rate": premium_rate,
        "insurance_premium": insurance_premium,
        "financed_principal": loan_amount + insurance_premium,
    }))
}

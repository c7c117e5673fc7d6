use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};

use mortgage_scenario_core::amortization::generate_amortization_schedule;
use mortgage_scenario_core::payment::{compute_monthly_payment, PaymentFrequency};

use super::decimal_arg;
use crate::input;

/// Loan terms shared by `payment` and `amortization`
#[derive(Args)]
pub struct LoanArgs {
    /// Amount financed, including any insurance premium
    #[arg(long, value_parser = decimal_arg)]
    pub principal: Option<Decimal>,

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

fn resolve(args: LoanArgs) -> Result<LoanRequest, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_json(path);
    }
    if let Some(req) = input::stdin::read_stdin()? {
        return Ok(req);
    }
    Ok(LoanRequest {
        principal: args
            .principal
            .ok_or("--principal is required (or provide --input)")?,
        annual_rate_pct: args
            .annual_rate_pct
            .ok_or("--annual-rate-pct is required (or provide --input)")?,
        years: args.years,
        frequency: args.frequency,
    })
}

pub fn run_payment(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let req = resolve(args)?;
    let monthly_payment = compute_monthly_payment(req.principal, req.annual_rate_pct, req.years)?;
    let periodic_payment = req.frequency.from_monthly(monthly_payment);
    let per_year = req.frequency.payments_per_year();

    Ok(json!({
        "principal": req.principal,
        "annual_rate_pct": req.annual_rate_pct,
        "years": req.years,
        "payment_frequency": req.frequency,
        "monthly_payment": monthly_payment,
        "periodic_payment": periodic_payment,
        "payments_per_year": per_year,
        "annual_total": periodic_payment * Decimal::from(per_year),
    }))
}

pub fn run_amortization(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let req = resolve(args)?;
    let rows = generate_amortization_schedule(req.principal, req.annual_rate_pct, req.years)?;
    Ok(serde_json::to_value(rows)?)
}

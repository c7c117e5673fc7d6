pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use colored::Colorize;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

use crate::OutputFormat;

/// Dispatch output to the appropriate formatter.
///
/// Formats that drop the analysis envelope still surface its warnings on
/// stderr so piping stdout stays clean.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => {
            csv_out::print_csv(value);
            print_warnings(value);
        }
        OutputFormat::Minimal => {
            minimal::print_minimal(value);
            print_warnings(value);
        }
    }
}

/// Human-facing rendering of a decimal string: amounts of one or more to
/// cents, smaller fractions (rates) to six places. Non-numeric text is
/// returned unchanged.
pub fn display_decimal(text: &str) -> String {
    match Decimal::from_str(text) {
        Ok(d) => {
            let places = if d.abs() >= Decimal::ONE { 2 } else { 6 };
            d.round_dp(places).normalize().to_string()
        }
        Err(_) => text.to_string(),
    }
}

fn print_warnings(value: &Value) {
    for w in envelope_warnings(value) {
        eprintln!("{}: {}", "warning".yellow().bold(), w);
    }
}

fn envelope_warnings(value: &Value) -> Vec<&str> {
    value
        .get("warnings")
        .and_then(Value::as_array)
        .map(|ws| ws.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_warnings_extracted() {
        let v = json!({"result": {}, "warnings": ["5% down: insured", 3]});
        assert_eq!(envelope_warnings(&v), vec!["5% down: insured"]);
    }

    #[test]
    fn test_display_decimal_rounds_money_to_cents() {
        assert_eq!(display_decimal("2514.0912345678901234567"), "2514.09");
        assert_eq!(display_decimal("99999.99999999999999999999999"), "100000");
        assert_eq!(display_decimal("16790"), "16790");
    }

    #[test]
    fn test_display_decimal_keeps_rates_and_text() {
        assert_eq!(display_decimal("0.031"), "0.031");
        assert_eq!(display_decimal("0.0033250000001"), "0.003325");
        assert_eq!(display_decimal("5% down"), "5% down");
        assert_eq!(display_decimal("monthly"), "monthly");
    }

    #[test]
    fn test_plain_results_have_no_warnings() {
        assert!(envelope_warnings(&json!([{"periodic_payment": "1"}])).is_empty());
        assert!(envelope_warnings(&json!("12.5")).is_empty());
    }
}

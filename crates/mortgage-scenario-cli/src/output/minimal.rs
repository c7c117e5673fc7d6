use super::display_decimal;
use serde_json::Value;

/// Key answer fields, most specific first.
const PRIORITY_KEYS: [&str; 6] = [
    "net_payable",
    "periodic_payment",
    "insurance_premium",
    "monthly_payment",
    "total_monthly",
    "total",
];

/// Print just the key answer value from the output.
///
/// Arrays print one answer per line, so `compare` yields one payment per
/// scenario.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result_obj {
        Value::Array(items) => {
            for item in items {
                println!("{}", pick_answer(item));
            }
        }
        other => println!("{}", pick_answer(other)),
    }
}

fn pick_answer(value: &Value) -> String {
    if let Value::Object(map) = value {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key) {
                if !val.is_null() {
                    return format_minimal(val);
                }
            }
        }

        // Purchase analysis: the shared land transfer tax is the headline
        if let Some(ltt) = map.get("land_transfer_tax") {
            return pick_answer(ltt);
        }

        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, format_minimal(val));
        }
    }
    format_minimal(value)
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => display_decimal(s),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{result_of, scalar_text, DETAIL_KEYS};

/// Format output as tables: one for the scalar fields of the result,
/// then one per detail array (schedule rows, payoff months, ...).
pub fn print_table(value: &Value) {
    let result = result_of(value);
    match result {
        Value::Object(map) => print_object(map),
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", scalar_text(result)),
    }

    if let Some(envelope) = value.as_object().filter(|m| m.contains_key("result")) {
        print_footer(envelope);
    }
}

fn print_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut scalar_rows = 0;
    for (key, val) in map {
        if DETAIL_KEYS.contains(&key.as_str()) {
            continue;
        }
        match val {
            Value::Object(nested) => {
                for (sub, v) in nested {
                    builder.push_record([format!("{key}.{sub}"), format_value(v)]);
                    scalar_rows += 1;
                }
            }
            _ => {
                builder.push_record([key.clone(), format_value(val)]);
                scalar_rows += 1;
            }
        }
    }
    if scalar_rows > 0 {
        println!("{}", Table::from(builder));
    }

    for key in DETAIL_KEYS {
        if let Some(Value::Array(arr)) = map.get(key) {
            if key == "series" {
                // Each series carries its own point list.
                for series in arr {
                    if let (Some(id), Some(Value::Array(points))) =
                        (series.get("loan_id"), series.get("points"))
                    {
                        println!("\nSeries: {}", scalar_text(id));
                        print_array_table(points);
                    }
                }
                continue;
            }
            println!("\n{}:", title(key));
            print_array_table(arr);
        }
    }
}

fn print_footer(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(headers.clone());

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn title(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::Array(arr) => arr
            .iter()
            .map(|v| match v {
                // Per-loan balances inside a payoff month
                Value::Object(m) => match (m.get("loan_id"), m.get("remaining_balance")) {
                    (Some(id), Some(bal)) => format!("{}={}", scalar_text(id), scalar_text(bal)),
                    _ => scalar_text(v),
                },
                _ => format_value(v),
            })
            .collect::<Vec<_>>()
            .join(", "),
        _ => scalar_text(value),
    }
}

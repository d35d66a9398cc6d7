use serde_json::Value;

use super::{result_of, scalar_text};

/// Headline fields, in order of preference.
const PRIORITY_KEYS: [&str; 7] = [
    "effective_apr_percent",
    "monthly_payment",
    "months_to_payoff",
    "total_interest_paid",
    "highest_total_interest_id",
    "total_interest",
    "interest_saved_vs_minimum_only",
];

/// Print just the key answer value from the output.
///
/// Looks for well-known result fields (including inside a nested
/// `summary`), falls back to the first field, and prints one line per
/// element for array results such as red-flag lists.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_text(result_of(value)));
}

fn minimal_text(result: &Value) -> String {
    match result {
        Value::Object(map) => {
            let scopes = [Some(map), map.get("summary").and_then(Value::as_object)];
            for key in PRIORITY_KEYS {
                for scope in scopes.iter().flatten() {
                    if let Some(val) = scope.get(key).filter(|v| !v.is_null()) {
                        return scalar_text(val);
                    }
                }
            }
            map.iter()
                .next()
                .map(|(k, v)| format!("{}: {}", k, scalar_text(v)))
                .unwrap_or_default()
        }
        Value::Array(arr) if arr.is_empty() => "none".to_string(),
        Value::Array(arr) => arr
            .iter()
            .map(|item| match (item.get("kind"), item.get("severity")) {
                (Some(kind), Some(sev)) => format!("{} ({})", scalar_text(kind), scalar_text(sev)),
                _ => scalar_text(item),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        other => scalar_text(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_apr_first() {
        let v = json!({"loan_id": "a", "monthly_payment": "304.22", "effective_apr_percent": "7.2"});
        assert_eq!(minimal_text(&v), "7.2");
    }

    #[test]
    fn test_nested_summary() {
        let v = json!({"months": [], "summary": {"strategy": "avalanche", "months_to_payoff": 19}});
        assert_eq!(minimal_text(&v), "19");
    }

    #[test]
    fn test_flag_list() {
        let v = json!([{"kind": "high_rate", "severity": "high"}]);
        assert_eq!(minimal_text(&v), "high_rate (high)");
        assert_eq!(minimal_text(&json!([])), "none");
    }
}

pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Array fields that hold the per-period or per-loan detail of a result,
/// in the order they are preferred for row-oriented output.
pub(crate) const DETAIL_KEYS: [&str; 6] = [
    "rows",
    "months",
    "payoffs",
    "summaries",
    "differences",
    "series",
];

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// The `result` of an output envelope, or the value itself.
pub(crate) fn result_of(value: &Value) -> &Value {
    value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value)
}

pub(crate) fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_result_of_envelope() {
        let v = json!({"result": {"a": 1}, "warnings": []});
        assert_eq!(result_of(&v), &json!({"a": 1}));
        let bare = json!([1, 2]);
        assert_eq!(result_of(&bare), &bare);
    }

    #[test]
    fn test_scalar_text() {
        assert_eq!(scalar_text(&json!("304.22")), "304.22");
        assert_eq!(scalar_text(&Value::Null), "");
        assert_eq!(scalar_text(&json!(true)), "true");
    }
}

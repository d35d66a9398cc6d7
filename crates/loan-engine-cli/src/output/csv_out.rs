use serde_json::Value;
use std::io;

use super::{result_of, scalar_text, DETAIL_KEYS};

/// Write output as CSV to stdout.
///
/// The first detail array of the result (schedule rows, payoff months,
/// comparison differences, ...) becomes the CSV body; results without one
/// fall back to two-column `field,value` rows.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    write_csv(&mut wtr, value);
    let _ = wtr.flush();
}

fn write_csv<W: io::Write>(wtr: &mut csv::Writer<W>, value: &Value) {
    match result_of(value) {
        Value::Object(result) => {
            let detail = DETAIL_KEYS
                .iter()
                .find_map(|k| result.get(*k).and_then(Value::as_array));
            match detail {
                Some(rows) => write_array_csv(wtr, rows),
                None => {
                    let _ = wtr.write_record(["field", "value"]);
                    for (key, val) in result {
                        let _ = wtr.write_record([key.as_str(), &scalar_text(val)]);
                    }
                }
            }
        }
        Value::Array(arr) => write_array_csv(wtr, arr),
        other => {
            let _ = wtr.write_record([&scalar_text(other)]);
        }
    }
}

/// One CSV row per array element; nested `balances` are spread into
/// `<loan_id>_balance` columns so payoff months stay flat.
fn write_array_csv<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            let _ = wtr.write_record([&scalar_text(item)]);
        }
        return;
    };

    let headers: Vec<String> = first
        .iter()
        .flat_map(|(k, v)| match (k.as_str(), v) {
            ("balances", Value::Array(balances)) => balances
                .iter()
                .filter_map(|b| b.get("loan_id").map(|id| format!("{}_balance", scalar_text(id))))
                .collect::<Vec<_>>(),
            _ => vec![k.clone()],
        })
        .collect();
    let _ = wtr.write_record(&headers);

    for item in arr {
        let Value::Object(map) = item else { continue };
        let mut row = Vec::with_capacity(headers.len());
        for (k, v) in map {
            match (k.as_str(), v) {
                ("balances", Value::Array(balances)) => {
                    for b in balances {
                        row.push(b.get("remaining_balance").map(scalar_text).unwrap_or_default());
                    }
                }
                _ => row.push(scalar_text(v)),
            }
        }
        let _ = wtr.write_record(&row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(value: &Value) -> String {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_csv(&mut wtr, value);
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_schedule_rows() {
        let v = json!({"result": {
            "loan_id": "a",
            "rows": [
                {"period": 1, "remaining_balance": "696.00"},
                {"period": 2, "remaining_balance": "0.00"}
            ]
        }});
        assert_eq!(
            render(&v),
            "period,remaining_balance\n1,696.00\n2,0.00\n"
        );
    }

    #[test]
    fn test_payoff_months_flatten_balances() {
        let v = json!({"result": {"months": [
            {"balances": [
                {"loan_id": "card", "remaining_balance": "400"},
                {"loan_id": "car", "remaining_balance": "900"}
            ], "month": 1}
        ]}});
        assert_eq!(render(&v), "card_balance,car_balance,month\n400,900,1\n");
    }

    #[test]
    fn test_scalar_result() {
        let v = json!({"result": {"effective_apr_percent": "7.1"}});
        assert_eq!(render(&v), "field,value\neffective_apr_percent,7.1\n");
    }
}

use serde_json::{Map, Value};
use std::io;

/// Write output as CSV to stdout.
///
/// A result carrying an amortization schedule is written as one row per
/// month; anything else becomes a flattened two-column field/value listing.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(rows) = find_schedule(result) {
        write_array_csv(&mut wtr, rows);
    } else if let Value::Array(arr) = result {
        write_array_csv(&mut wtr, arr);
    } else if let Value::Object(map) = result {
        let _ = wtr.write_record(["field", "value"]);
        let mut flat = Vec::new();
        flatten("", map, &mut flat);
        for (key, val) in flat {
            let _ = wtr.write_record([key.as_str(), &val]);
        }
    } else {
        let _ = wtr.write_record([&format_csv_value(result)]);
    }

    let _ = wtr.flush();
}

fn find_schedule(result: &Value) -> Option<&[Value]> {
    result
        .get("schedule")
        .or_else(|| result.get("loan").and_then(|l| l.get("schedule")))
        .and_then(|s| s.as_array())
        .map(|v| v.as_slice())
}

/// Flatten nested objects into dotted keys (`breakdown.roadTax`).
pub(crate) fn flatten(prefix: &str, map: &Map<String, Value>, out: &mut Vec<(String, String)>) {
    for (key, val) in map {
        let full = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) => flatten(&full, inner, out),
            _ => out.push((full, format_csv_value(val))),
        }
    }
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

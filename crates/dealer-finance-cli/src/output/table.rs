use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::csv_out::flatten;

/// Format output as tables using the tabled crate.
///
/// Scalar and nested-object fields of the result go into one Field/Value
/// table; arrays of objects (the amortization schedule, accessory lines)
/// get a table of their own.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_object(map);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res_map) => print_object(res_map),
        other => println!("{}", other),
    }

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

fn print_object(map: &Map<String, Value>) {
    let mut scalars = Map::new();
    let mut tables: Vec<(String, &Vec<Value>)> = Vec::new();
    collect(String::new(), map, &mut scalars, &mut tables);

    let mut flat = Vec::new();
    flatten("", &scalars, &mut flat);
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in flat {
        builder.push_record([key, val]);
    }
    println!("{}", Table::from(builder));

    for (name, rows) in tables {
        println!("\n{}:", name);
        print_array_table(rows);
    }
}

/// Split arrays of objects out of the (possibly nested) result so they can be
/// rendered as their own tables.
fn collect<'a>(
    prefix: String,
    map: &'a Map<String, Value>,
    scalars: &mut Map<String, Value>,
    tables: &mut Vec<(String, &'a Vec<Value>)>,
) {
    for (key, val) in map {
        let full = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Array(arr) if arr.first().is_some_and(|v| v.is_object()) => {
                tables.push((full, arr));
            }
            Value::Object(inner) => collect(full, inner, scalars, tables),
            _ => {
                scalars.insert(full, val.clone());
            }
        }
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
        builder.push_record(&headers);

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

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collect_splits_schedule() {
        let v = json!({
            "emi": "16801",
            "schedule": [{"month": 1}, {"month": 2}],
            "pricing": {"breakdown": {"hsrp": "600"}, "accessories": []}
        });
        let mut scalars = Map::new();
        let mut tables = Vec::new();
        collect(String::new(), v.as_object().unwrap(), &mut scalars, &mut tables);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].0, "schedule");
        assert!(scalars.contains_key("emi"));
        assert!(scalars.contains_key("pricing.breakdown.hsrp"));
        assert!(scalars.contains_key("pricing.accessories"));
    }
}

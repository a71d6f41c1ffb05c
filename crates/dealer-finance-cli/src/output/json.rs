use serde::Serialize;
use serde_json::Value;

/// Pretty-print JSON to stdout.
pub fn print_json(value: &Value) {
    print_serializable(value);
}

/// Pretty-print any serializable body (used for structured error bodies too).
pub fn print_serializable<T: Serialize>(body: &T) {
    match serde_json::to_string_pretty(body) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}

//! Output formatting

use serde_json::Value;

/// Pretty-print an API result to stdout, falling back to the compact
/// Display form if pretty serialization fails
pub fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(_) => println!("{}", value),
    }
}

pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use ngitung_core::currency::UNAVAILABLE;
use serde_json::Value;

/// Dispatch output to the appropriate formatter. `null` means the command
/// already printed its own output.
pub fn format_output(format: &OutputFormat, value: &Value) {
    if value.is_null() {
        return;
    }
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(value) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("JSON serialization error: {}", e),
        },
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Flatten nested objects into `parent.child` keys so scenario and
/// composition sections fit a two-column layout.
pub fn flatten_fields(value: &Value) -> Vec<(String, String)> {
    let mut rows = Vec::new();
    collect_fields("", value, &mut rows);
    rows
}

fn collect_fields(prefix: &str, value: &Value, rows: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                collect_fields(&path, val, rows);
            }
        }
        other => rows.push((prefix.to_string(), format_scalar(other))),
    }
}

/// Render a leaf value. Undefined values (e.g. break-even at a price that
/// never covers BPP) show as the unavailable marker.
pub fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => UNAVAILABLE.to_string(),
        Value::Array(arr) => arr.iter().map(format_scalar).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{flatten_fields, format_scalar};

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Array(items)) => {
                print_array_table(items);
                print_envelope_notes(map);
            }
            Some(result) => {
                print_field_table(result);
                print_envelope_notes(map);
            }
            None => print_field_table(value),
        },
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", format_scalar(value)),
    }
}

fn print_field_table(value: &Value) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in flatten_fields(value) {
        builder.push_record([key, val]);
    }
    println!("{}", Table::from(builder));
}

fn print_envelope_notes(envelope: &serde_json::Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

/// One row per item (notes, recommendations); columns from the first item.
fn print_array_table(arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        if arr.is_empty() {
            println!("(empty)");
        }
        for item in arr {
            println!("{}", format_scalar(item));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for item in arr {
        let row: Vec<String> = headers
            .iter()
            .map(|h| item.get(h.as_str()).map(format_scalar).unwrap_or_default())
            .collect();
        builder.push_record(row);
    }
    println!("{}", Table::from(builder));
}

use serde_json::Value;
use std::io;

use super::{flatten_fields, format_scalar};

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let body = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match body {
        Value::Array(items) => write_rows(&mut wtr, items),
        other => {
            let _ = wtr.write_record(["field", "value"]);
            for (key, val) in flatten_fields(other) {
                let _ = wtr.write_record([key, val]);
            }
        }
    }

    let _ = wtr.flush();
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, items: &[Value]) {
    let Some(Value::Object(first)) = items.first() else {
        for item in items {
            let _ = wtr.write_record([format_scalar(item)]);
        }
        return;
    };
    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    let _ = wtr.write_record(&headers);
    for item in items {
        let row: Vec<String> = headers
            .iter()
            .map(|h| item.get(*h).map(format_scalar).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&row);
    }
}

use serde_json::Value;

use super::format_scalar;

/// Fields printed by `--output minimal`, most important first.
const PRIORITY_KEYS: [&str; 6] = [
    "selling_price_after_tax",
    "selling_price",
    "new_selling_price",
    "price",
    "id",
    "title",
];

/// Print just the headline value of the output.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_line(value));
}

fn minimal_line(value: &Value) -> String {
    let body = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match body {
        Value::Object(map) => {
            for key in PRIORITY_KEYS {
                if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                    return format_scalar(val);
                }
            }
            match map.iter().next() {
                Some((key, val)) => format!("{}: {}", key, format_scalar(val)),
                None => String::new(),
            }
        }
        Value::Array(items) => items
            .iter()
            .map(minimal_line)
            .collect::<Vec<_>>()
            .join("\n"),
        other => format_scalar(other),
    }
}

//! Plain-text rendering for terminal output.
//!
//! Objects print as `key: value` lines, nested objects are indented under
//! their key, and arrays of objects print as blocks separated by blank lines.

use serde_json::Value;

#[must_use]
pub fn render_value(value: &Value) -> String {
    let mut out = Vec::new();
    write_value(value, 0, &mut out);
    out.join("\n")
}

fn write_value(value: &Value, depth: usize, out: &mut Vec<String>) {
    let pad = "  ".repeat(depth);
    match value {
        Value::Object(map) => {
            for (key, value) in map {
                match value {
                    Value::Object(inner) if !inner.is_empty() => {
                        out.push(format!("{pad}{key}:"));
                        write_value(value, depth + 1, out);
                    }
                    _ => out.push(format!("{pad}{key}: {}", cell(value))),
                }
            }
        }
        Value::Array(items) if items.is_empty() => out.push(format!("{pad}(none)")),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                if index > 0 && item.is_object() {
                    out.push(String::new());
                }
                match item {
                    Value::Object(_) => write_value(item, depth, out),
                    other => out.push(format!("{pad}- {}", cell(other))),
                }
            }
        }
        scalar => out.push(format!("{pad}{}", cell(scalar))),
    }
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(text) => text.clone(),
        Value::Array(items) if items.iter().all(|item| !item.is_object()) => {
            if items.is_empty() {
                "-".to_string()
            } else {
                items.iter().map(cell).collect::<Vec<_>>().join(", ")
            }
        }
        other => other.to_string(),
    }
}

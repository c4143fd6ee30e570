use serde_json::Value;

use super::format_value;

/// Print just the key answer value from the output.
///
/// Looks up well-known result paths in order of priority, then falls back
/// to the first field of the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    // Dotted paths into the result
    let priority_paths = [
        "cash_flows.net_position",
        "net_position",
        "snapped",
        "ipo_price",
        "default",
    ];

    for path in &priority_paths {
        if let Some(val) = lookup(result_obj, path) {
            if !val.is_null() {
                println!("{}", format_value(val));
                return;
            }
        }
    }

    if let Value::Object(map) = result_obj {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_value(val));
            return;
        }
    }

    println!("{}", format_value(result_obj));
}

fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |v, key| v.get(key))
}

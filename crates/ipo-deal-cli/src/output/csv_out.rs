use serde_json::Value;
use std::io;

use super::{flatten, format_value};

/// Write output as two-column CSV (`field,value`) to stdout.
///
/// Only the `result` section of an envelope is written; warnings and
/// methodology stay out of the data.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let data = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in flatten(data) {
        let cell = match val {
            Value::Null => String::new(),
            ref other => format_value(other),
        };
        let _ = wtr.write_record([key.as_str(), cell.as_str()]);
    }

    let _ = wtr.flush();
}

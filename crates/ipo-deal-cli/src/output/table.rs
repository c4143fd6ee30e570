use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{flatten, format_value};

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) if map.contains_key("narrative") => print_dashboard(map),
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_flat_object(value);
            }
        }
        _ => println!("{}", format_value(value)),
    }
}

fn print_result_table(result: &Value, envelope: &serde_json::Map<String, Value>) {
    print_flat_object(result);
    print_warnings(envelope);

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_flat_object(value: &Value) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in flatten(value) {
        builder.push_record([key, format_value(&val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_warnings(map: &serde_json::Map<String, Value>) {
    if let Some(Value::Array(warnings)) = map.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }
}

/// Text rendering of the dashboard: KPIs, waterfall, then narrative sections.
fn print_dashboard(map: &serde_json::Map<String, Value>) {
    let text = |key: &str| map.get(key).map(format_value).unwrap_or_default();

    println!("{} (IPO price {})\n", text("title"), text("ipo_price"));

    if let Some(Value::Array(metrics)) = map.get("metrics") {
        let mut builder = Builder::default();
        builder.push_record(["Metric", "Value"]);
        for m in metrics {
            builder.push_record([field(m, "label"), field(m, "display")]);
        }
        println!("{}", Table::from(builder));
    }

    if let Some(Value::Array(bars)) = map.get("waterfall") {
        println!("\n{}", text("waterfall_title"));
        let mut builder = Builder::default();
        builder.push_record(["Step", "Measure", "Amount"]);
        for b in bars {
            builder.push_record([field(b, "label"), field(b, "measure"), field(b, "text")]);
        }
        println!("{}", Table::from(builder));
    }

    if let Some(Value::Array(sections)) = map.get("narrative") {
        for s in sections {
            println!("\n== {} ==\n", field(s, "title"));
            println!("{}", field(s, "body"));
        }
    }

    let caption = text("caption");
    if !caption.is_empty() {
        println!("\n{caption}");
    }

    print_warnings(map);
}

fn field(value: &Value, key: &str) -> String {
    value.get(key).map(format_value).unwrap_or_default()
}

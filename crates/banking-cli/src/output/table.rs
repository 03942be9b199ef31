use colored::Colorize;
use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::scalar;

/// Print the result as a field/value table, followed by any row lists
/// (schedule, brackets, allocations) as their own tables, then warnings and
/// methodology from the envelope.
pub fn print_table(value: &Value) {
    let Value::Object(envelope) = value else {
        println!("{}", scalar(value));
        return;
    };

    match envelope.get("result") {
        Some(Value::Object(result)) => print_record(result),
        _ => print_record(envelope),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\n{}", "Warnings:".yellow().bold());
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }
    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_record(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut row_lists = Vec::new();
    for (key, val) in map {
        match val {
            Value::Array(rows) if rows.first().is_some_and(Value::is_object) => {
                row_lists.push((key, rows));
            }
            _ => builder.push_record([key.as_str(), &display(val)]),
        }
    }
    println!("{}", Table::from(builder));

    for (key, rows) in row_lists {
        println!("\n{}", key.bold());
        print_rows(rows);
    }
}

fn print_rows(rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        return;
    };
    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);
    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(display).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }
    println!("{}", Table::from(builder));
}

fn display(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::Array(items) => items.iter().map(display).collect::<Vec<_>>().join(", "),
        other => scalar(other),
    }
}

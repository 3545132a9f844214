use serde_json::Value;
use tabled::{builder::Builder, Table};

/// Format output as a field/value table using the tabled crate.
///
/// The limit calculation nests its persistable record under `record`; that
/// section is printed as its own table after the calculation trace.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            let mut builder = Builder::default();
            builder.push_record(["Field", "Value"]);
            for (key, val) in map {
                if key == "record" {
                    continue;
                }
                push_value(&mut builder, key, val);
            }
            println!("{}", Table::from(builder));

            if let Some(Value::Object(record)) = map.get("record") {
                let mut builder = Builder::default();
                builder.push_record(["Record Field", "Value"]);
                for (key, val) in record {
                    push_value(&mut builder, key, val);
                }
                println!("\n{}", Table::from(builder));
            }
        }
        Value::Array(arr) => {
            for item in arr {
                print_table(item);
            }
        }
        _ => println!("{}", value),
    }
}

fn push_value(builder: &mut Builder, key: &str, value: &Value) {
    match value {
        // Nested objects (e.g. fuzzy inputs, KYC scores) flatten into
        // dotted rows so the table stays two columns wide.
        Value::Object(map) => {
            for (inner_key, inner) in map {
                builder.push_record([format!("{key}.{inner_key}"), format_value(inner)]);
            }
        }
        _ => builder.push_record([key.to_string(), format_value(value)]),
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

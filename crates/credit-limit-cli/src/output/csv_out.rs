use serde_json::Value;
use std::io;

/// Write output as two-column field/value CSV to stdout, flattening nested
/// objects into dotted keys.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let _ = wtr.write_record(["field", "value"]);
    write_value(&mut wtr, "", value);
    let _ = wtr.flush();
}

fn write_value(wtr: &mut csv::Writer<io::StdoutLock<'_>>, prefix: &str, value: &Value) {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                write_value(wtr, &path, val);
            }
        }
        Value::Array(arr) => {
            for (i, item) in arr.iter().enumerate() {
                write_value(wtr, &format!("{prefix}[{i}]"), item);
            }
        }
        _ => {
            let _ = wtr.write_record([prefix, &format_csv_value(value)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

use serde_json::Value;

/// Print just the key answer value from the output.
///
/// Heuristic: look for well-known result fields in order of priority,
/// then fall back to the first field of the object.
pub fn print_minimal(value: &Value) {
    // The limit calculation nests its persistable record under `record`.
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("record"))
        .unwrap_or(value);

    let priority_keys = [
        "creditLimit",
        "user_risk_score",
        "risk_score_output",
        "character_score",
        "disposableIncome",
        "avgMonthlyIncome",
    ];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

use serde_json::Value;

/// One checklist line item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub text: String,
    pub checked: bool,
}

/// Decode the client-side checklist JSON.
///
/// Never fails: anything other than an array of objects yields an empty list,
/// and items without text are skipped.
pub fn decode(raw: &str) -> Vec<Condition> {
    let items = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items,
        Ok(Value::Null) => return Vec::new(),
        Ok(other) => {
            tracing::debug!("Ignoring non-array conditions payload: {other}");
            return Vec::new();
        }
        Err(e) => {
            tracing::debug!("Ignoring malformed conditions JSON: {e}");
            return Vec::new();
        }
    };

    let mut conditions = Vec::with_capacity(items.len());
    for item in &items {
        let Some(obj) = item.as_object() else {
            tracing::debug!("Ignoring conditions payload with non-object item: {item}");
            return Vec::new();
        };

        let text = match obj.get("text") {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };
        if text.is_empty() {
            continue;
        }

        conditions.push(Condition {
            text,
            checked: obj.get("checked").is_some_and(truthy),
        });
    }
    conditions
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Null => false,
    }
}

use serde_json::Value;

/// Lenient field access over loosely typed payloads.
///
/// Every accessor returns `None` (or an empty slice) when the key is missing,
/// the receiver is not an object, or the value has the wrong JSON type.
pub trait FieldExt {
    fn field(&self, key: &str) -> Option<&Value>;

    /// String, number or bool rendered as text. Blank strings read as absent.
    fn text(&self, key: &str) -> Option<String> {
        match self.field(key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Number, or a string holding one
    fn number(&self, key: &str) -> Option<f64> {
        let value = match self.field(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        value.filter(|n| n.is_finite())
    }

    /// Non-negative whole count; fractional values are truncated
    fn count(&self, key: &str) -> Option<u64> {
        self.number(key).filter(|n| *n >= 0.0).map(|n| n as u64)
    }

    fn integer(&self, key: &str) -> Option<i64> {
        self.number(key).map(|n| n as i64)
    }

    fn flag(&self, key: &str) -> Option<bool> {
        match self.field(key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => match s.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Nested object
    fn child(&self, key: &str) -> Option<&Value> {
        self.field(key).filter(|v| v.is_object())
    }

    /// Array elements, empty when absent
    fn list(&self, key: &str) -> &[Value] {
        match self.field(key) {
            Some(Value::Array(items)) => items,
            _ => &[],
        }
    }
}

impl FieldExt for Value {
    fn field(&self, key: &str) -> Option<&Value> {
        self.get(key).filter(|v| !v.is_null())
    }
}

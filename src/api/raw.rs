use serde_json::Value;

use super::Id;

/// Read-only view over an upstream JSON object whose field names drift
/// between endpoints.
///
/// Every reader takes an ordered list of candidate keys; the order is the
/// precedence and earlier keys win.
#[derive(Clone, Copy, Debug)]
pub struct Raw<'a>(&'a Value);

impl<'a> Raw<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self(value)
    }

    pub fn value(self) -> &'a Value {
        self.0
    }

    /// First candidate holding a truthy value, i.e. anything except null,
    /// `false`, `0` and `""`.
    pub fn truthy(self, keys: &[&str]) -> Option<&'a Value> {
        keys.iter()
            .filter_map(|key| self.0.get(key))
            .find(|value| is_truthy(value))
    }

    /// First candidate that is present and not null.
    pub fn present(self, keys: &[&str]) -> Option<&'a Value> {
        keys.iter()
            .filter_map(|key| self.0.get(key))
            .find(|value| !value.is_null())
    }

    pub fn str(self, keys: &[&str]) -> Option<String> {
        self.truthy(keys).and_then(as_text)
    }

    pub fn id(self, keys: &[&str]) -> Option<Id> {
        self.truthy(keys).and_then(Id::from_value)
    }

    pub fn f64(self, keys: &[&str]) -> Option<f64> {
        self.present(keys).and_then(as_number)
    }

    pub fn bool(self, keys: &[&str]) -> bool {
        self.truthy(keys).is_some()
    }

    /// Nested object under `key`, if that is what the field holds.
    pub fn object(self, key: &str) -> Option<Raw<'a>> {
        self.0.get(key).filter(|value| value.is_object()).map(Raw)
    }

    /// Elements of the first candidate that is an array.
    pub fn array(self, keys: &[&str]) -> Option<&'a [Value]> {
        keys.iter()
            .filter_map(|key| self.0.get(key))
            .find_map(|value| value.as_array().map(Vec::as_slice))
    }
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Scalar rendered as text; numbers keep their JSON spelling.
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

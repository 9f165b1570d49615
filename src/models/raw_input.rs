use serde_json::Value;

/// Caller-supplied content of unknown shape.
///
/// Every JSON value maps onto exactly one variant, which keeps the
/// normalization fallbacks exhaustive.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    /// Plain text, used verbatim.
    Text(String),
    /// A JSON object or array.
    Structured(Value),
    /// A scalar that is not a string: number, boolean or null.
    Other(Value),
}

impl RawInput {
    /// Returns true when the input is "falsy" in the loose sense used by
    /// browser clients: null, `false`, zero, or an empty string.
    ///
    /// Objects and arrays are never falsy, even when empty.
    pub fn is_falsy(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Structured(_) => false,
            Self::Other(Value::Null) => true,
            Self::Other(Value::Bool(b)) => !b,
            Self::Other(Value::Number(n)) => n.as_f64().is_some_and(|f| f == 0.0),
            Self::Other(Value::String(s)) => s.is_empty(),
            Self::Other(_) => false,
        }
    }
}

impl From<Value> for RawInput {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => Self::Text(text),
            Value::Object(_) | Value::Array(_) => Self::Structured(value),
            Value::Null | Value::Bool(_) | Value::Number(_) => Self::Other(value),
        }
    }
}

impl From<String> for RawInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for RawInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

//! Values bound to template keys.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A value a placeholder can resolve to.
///
/// Deserializes from plain JSON: integers become `Int`, other numbers
/// `Float`, strings `Str`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    /// Type a raw string: an integer if it parses as one, then a finite
    /// float, otherwise the string itself.
    pub fn infer(raw: &str) -> Self {
        if let Ok(n) = raw.parse::<i64>() {
            return Value::Int(n);
        }
        match raw.parse::<f64>() {
            Ok(n) if n.is_finite() => Value::Float(n),
            _ => Value::Str(raw.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            // Integral floats print without `.0`, at any magnitude.
            Value::Float(n) => write!(f, "{n}"),
            Value::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

/// The key/value bindings a template renders against.
///
/// Rendering mutates it: `for` tags bind their loop variable for the length
/// of the loop, and extension functions may change anything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    values: HashMap<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// A context binding every key to its own name. Rendering a template
    /// against it shows where each placeholder lands.
    pub fn echo<I>(keys: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        keys.into_iter()
            .map(|key| {
                let key = key.as_ref();
                (key.to_string(), Value::from(key))
            })
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Bind `key`, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Context {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Context {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        self.values
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // =========================================================================
    // Value
    // =========================================================================

    #[test]
    fn test_display() {
        assert_eq!(Value::Int(-3).to_string(), "-3");
        assert_eq!(Value::Float(2.0).to_string(), "2");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::from("a b").to_string(), "a b");
    }

    #[test]
    fn test_display_large_float() {
        assert_eq!(Value::Float(1e20).to_string(), "100000000000000000000");
        assert_eq!(Value::Float(-1e20).to_string(), "-100000000000000000000");
        assert_eq!(Value::Float(9.5e18).to_string(), "9500000000000000000");
    }

    #[test]
    fn test_infer() {
        assert_eq!(Value::infer("42"), Value::Int(42));
        assert_eq!(Value::infer("-1"), Value::Int(-1));
        assert_eq!(Value::infer("1.5"), Value::Float(1.5));
        assert_eq!(Value::infer("inf"), Value::from("inf"));
        assert_eq!(Value::infer("Ada"), Value::from("Ada"));
        assert_eq!(Value::infer(""), Value::from(""));
    }

    #[test]
    fn test_deserialize_from_json() {
        let ctx: Context =
            serde_json::from_str(r#"{"n": 3, "ratio": 0.5, "name": "Ada"}"#).unwrap();
        assert_eq!(ctx.get("n"), Some(&Value::Int(3)));
        assert_eq!(ctx.get("ratio"), Some(&Value::Float(0.5)));
        assert_eq!(ctx.get("name"), Some(&Value::from("Ada")));
    }

    #[test]
    fn test_serialize_untagged() {
        let json = serde_json::to_string(&Value::Int(7)).unwrap();
        assert_eq!(json, "7");
    }

    // =========================================================================
    // Context
    // =========================================================================

    #[test]
    fn test_set_returns_previous() {
        let mut ctx = Context::new();
        assert_eq!(ctx.set("i", 1), None);
        assert_eq!(ctx.set("i", 2), Some(Value::Int(1)));
        assert_eq!(ctx.remove("i"), Some(Value::Int(2)));
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_echo() {
        let ctx = Context::echo(["title", "name"]);
        assert_eq!(ctx.len(), 2);
        assert_eq!(ctx.get("title"), Some(&Value::from("title")));
        assert!(ctx.contains("name"));
    }

    #[test]
    fn test_collect_and_extend() {
        let mut ctx: Context = [("a", 1)].into_iter().collect();
        ctx.extend([("b", "x")]);
        assert_eq!(ctx.get("a"), Some(&Value::Int(1)));
        assert_eq!(ctx.get("b"), Some(&Value::from("x")));
    }
}

//! Record keys.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// An opaque identifier for one record.
///
/// Keys are stable across rebuilds of the collection and compare by value.
/// Cloning is cheap: string keys share their allocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    /// An integer identifier.
    Int(i64),
    /// A string identifier.
    Str(Arc<str>),
}

impl Key {
    /// The string form of the key, if it is a string key.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::Str(s) => Some(s),
            Key::Int(_) => None,
        }
    }

    /// The integer form of the key, if it is an integer key.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Key::Int(n) => Some(*n),
            Key::Str(_) => None,
        }
    }

    /// Read a key out of a JSON scalar.
    ///
    /// Integers and strings become keys; everything else is rejected.
    pub fn from_json(value: &serde_json::Value) -> Option<Key> {
        match value {
            serde_json::Value::String(s) => Some(Key::from(s.as_str())),
            serde_json::Value::Number(n) => n.as_i64().map(Key::Int),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(n) => write!(f, "{n}"),
            Key::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(Arc::from(s))
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Str(Arc::from(s))
    }
}

impl From<i64> for Key {
    fn from(n: i64) -> Self {
        Key::Int(n)
    }
}

impl From<i32> for Key {
    fn from(n: i32) -> Self {
        Key::Int(i64::from(n))
    }
}

impl From<usize> for Key {
    fn from(n: usize) -> Self {
        Key::Int(n as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_equality_by_value() {
        assert_eq!(Key::from("a"), Key::from(String::from("a")));
        assert_eq!(Key::from(3i32), Key::from(3usize));
        assert_ne!(Key::from("3"), Key::from(3i64));
    }

    #[test]
    fn test_key_display() {
        assert_eq!(Key::from("row-1").to_string(), "row-1");
        assert_eq!(Key::from(-7i64).to_string(), "-7");
    }

    #[test]
    fn test_key_serde_untagged() {
        let keys: Vec<Key> = serde_json::from_str(r#"[1, "two"]"#).unwrap();
        assert_eq!(keys, vec![Key::Int(1), Key::from("two")]);
        assert_eq!(serde_json::to_string(&keys).unwrap(), r#"[1,"two"]"#);
    }

    #[test]
    fn test_key_from_json() {
        assert_eq!(Key::from_json(&serde_json::json!(5)), Some(Key::Int(5)));
        assert_eq!(Key::from_json(&serde_json::json!("x")), Some(Key::from("x")));
        assert_eq!(Key::from_json(&serde_json::json!(1.5)), None);
        assert_eq!(Key::from_json(&serde_json::json!(null)), None);
    }
}

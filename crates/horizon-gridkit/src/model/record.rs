//! Field access on source records.
//!
//! Sort rules address record fields by path. A [`FieldPath`] is written as
//! `"author.name"` or `"author/name"`; numeric segments index into arrays
//! (`"tags.0"`).

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A parsed field path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct FieldPath {
    raw: Arc<str>,
    segments: Arc<[String]>,
}

impl FieldPath {
    /// Parse a path, splitting on `.` or `/`. Empty segments are ignored.
    pub fn parse(path: &str) -> Self {
        let segments: Vec<String> = path
            .split(['.', '/'])
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        Self {
            raw: Arc::from(path),
            segments: segments.into(),
        }
    }

    /// The path as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The individual segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

impl From<String> for FieldPath {
    fn from(path: String) -> Self {
        Self::parse(&path)
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.raw.to_string()
    }
}

/// The value of a record field, as seen by the sort comparators.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    Text(Cow<'a, str>),
    Number(f64),
    Bool(bool),
    /// The field is absent, null, or not a scalar.
    Missing,
}

impl FieldValue<'_> {
    /// Whether the value is [`FieldValue::Missing`].
    pub fn is_missing(&self) -> bool {
        matches!(self, FieldValue::Missing)
    }
}

/// A source record whose fields can be sorted on.
pub trait Record: Send + Sync + 'static {
    /// Look up the field at `path`.
    fn field(&self, path: &FieldPath) -> FieldValue<'_>;
}

impl Record for serde_json::Value {
    fn field(&self, path: &FieldPath) -> FieldValue<'_> {
        let mut current = self;
        for segment in path.segments() {
            let next = match current {
                serde_json::Value::Object(map) => map.get(segment),
                serde_json::Value::Array(items) => {
                    segment.parse::<usize>().ok().and_then(|i| items.get(i))
                }
                _ => None,
            };
            match next {
                Some(value) => current = value,
                None => return FieldValue::Missing,
            }
        }
        match current {
            serde_json::Value::String(s) => FieldValue::Text(Cow::Borrowed(s)),
            serde_json::Value::Number(n) => n.as_f64().map_or(FieldValue::Missing, FieldValue::Number),
            serde_json::Value::Bool(b) => FieldValue::Bool(*b),
            _ => FieldValue::Missing,
        }
    }
}

impl Record for String {
    /// A bare string answers every path with itself.
    fn field(&self, _path: &FieldPath) -> FieldValue<'_> {
        FieldValue::Text(Cow::Borrowed(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_path_parsing() {
        let path = FieldPath::parse("author.name/first");
        assert_eq!(path.segments(), ["author", "name", "first"]);
        assert_eq!(path.to_string(), "author.name/first");
        assert!(FieldPath::parse("..").segments().is_empty());
    }

    #[test]
    fn test_json_field_lookup() {
        let record = json!({
            "name": "Alice",
            "age": 30,
            "active": true,
            "meta": { "tags": ["a", "b"] },
            "nothing": null
        });

        assert_eq!(record.field(&"name".into()), FieldValue::Text("Alice".into()));
        assert_eq!(record.field(&"age".into()), FieldValue::Number(30.0));
        assert_eq!(record.field(&"active".into()), FieldValue::Bool(true));
        assert_eq!(record.field(&"meta.tags.1".into()), FieldValue::Text("b".into()));
        assert!(record.field(&"meta.tags.9".into()).is_missing());
        assert!(record.field(&"nothing".into()).is_missing());
        assert!(record.field(&"meta".into()).is_missing());
        assert!(record.field(&"name.first".into()).is_missing());
    }

    #[test]
    fn test_path_serde_as_string() {
        let path: FieldPath = serde_json::from_str(r#""a.b""#).unwrap();
        assert_eq!(path.segments(), ["a", "b"]);
        assert_eq!(serde_json::to_string(&path).unwrap(), r#""a.b""#);
    }
}

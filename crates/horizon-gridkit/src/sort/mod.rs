//! Sorting and filtering of collection records.
//!
//! [`SortRule`]s name a record field (or insertion order), a direction and
//! the value type to compare as. [`build_comparator`] chains them left to
//! right, and [`filter_and_sort`] combines the chain with search membership
//! and relevance scores to produce the visible ordering.
//!
//! # Example
//!
//! ```
//! use horizon_gridkit::model::RecordEntry;
//! use horizon_gridkit::sort::{filter_and_sort, Collation, SortRule, SortType};
//! use serde_json::json;
//!
//! let entries = vec![
//!     RecordEntry::new("a", json!({"name": "Alice", "age": 30}), None, 0),
//!     RecordEntry::new("b", json!({"name": "Alice", "age": 20}), None, 1),
//!     RecordEntry::new("c", json!({"name": "Bob", "age": 35}), None, 2),
//! ];
//! let rules = [
//!     SortRule::ascending("name", SortType::String),
//!     SortRule::ascending("age", SortType::Number),
//! ];
//! let sorted = filter_and_sort(&entries, None, None, &rules, &Collation::codepoint());
//! let keys: Vec<String> = sorted.iter().map(|e| e.key.to_string()).collect();
//! assert_eq!(keys, ["b", "a", "c"]);
//! ```

mod collation;
mod comparator;
mod pipeline;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use collation::Collation;
pub use comparator::{Comparator, build_comparator, parse_date_millis};
pub use pipeline::{MISSING_SCORE, filter_and_sort};

use crate::model::FieldPath;

/// Property name that sorts by ingestion order.
pub const INSERTION_ORDER: &str = "*";

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Orient an ascending comparison result.
    #[inline]
    pub fn apply(self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// How field values are interpreted for comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortType {
    #[default]
    String,
    Number,
    Date,
    Boolean,
}

/// What a rule sorts on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SortProperty {
    /// The record's position in the ingested sequence (`"*"`).
    InsertionOrder,
    /// A record field.
    Field(FieldPath),
}

impl SortProperty {
    pub fn parse(name: &str) -> Self {
        if name == INSERTION_ORDER {
            SortProperty::InsertionOrder
        } else {
            SortProperty::Field(FieldPath::parse(name))
        }
    }
}

impl fmt::Display for SortProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortProperty::InsertionOrder => f.write_str(INSERTION_ORDER),
            SortProperty::Field(path) => write!(f, "{path}"),
        }
    }
}

impl From<&str> for SortProperty {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

impl From<String> for SortProperty {
    fn from(name: String) -> Self {
        Self::parse(&name)
    }
}

impl From<SortProperty> for String {
    fn from(property: SortProperty) -> Self {
        property.to_string()
    }
}

/// One sort key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortRule {
    pub property: SortProperty,
    #[serde(default)]
    pub direction: SortDirection,
    #[serde(default, rename = "type")]
    pub sort_type: SortType,
}

impl SortRule {
    pub fn new(property: impl Into<SortProperty>, direction: SortDirection, sort_type: SortType) -> Self {
        Self {
            property: property.into(),
            direction,
            sort_type,
        }
    }

    pub fn ascending(property: impl Into<SortProperty>, sort_type: SortType) -> Self {
        Self::new(property, SortDirection::Asc, sort_type)
    }

    pub fn descending(property: impl Into<SortProperty>, sort_type: SortType) -> Self {
        Self::new(property, SortDirection::Desc, sort_type)
    }

    /// Oldest first (`Asc`) or newest first (`Desc`).
    pub fn insertion_order(direction: SortDirection) -> Self {
        Self::new(SortProperty::InsertionOrder, direction, SortType::Number)
    }
}

/// The ordered list of active sort rules. The first rule is primary; the
/// rest only break ties.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortState(pub Vec<SortRule>);

impl SortState {
    pub fn new(rules: impl IntoIterator<Item = SortRule>) -> Self {
        Self(rules.into_iter().collect())
    }

    pub fn rules(&self) -> &[SortRule] {
        &self.0
    }

    pub fn primary(&self) -> Option<&SortRule> {
        self.0.first()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Column-header click semantics.
    ///
    /// Choosing the current primary property flips its direction. Any other
    /// property becomes the ascending primary rule and the previous rules
    /// stay behind it as tiebreakers.
    pub fn toggled(&self, property: impl Into<SortProperty>, sort_type: SortType) -> SortState {
        let property = property.into();
        match self.primary() {
            Some(primary) if primary.property == property => {
                let mut rules = self.0.clone();
                rules[0].direction = primary.direction.reversed();
                rules[0].sort_type = sort_type;
                SortState(rules)
            }
            _ => {
                let mut rules: Vec<SortRule> =
                    self.0.iter().filter(|r| r.property != property).cloned().collect();
                rules.insert(0, SortRule::ascending(property, sort_type));
                SortState(rules)
            }
        }
    }

    /// Append `rule` as the lowest-priority tiebreaker, replacing any rule
    /// on the same property.
    pub fn with_rule(&self, rule: SortRule) -> SortState {
        let mut rules: Vec<SortRule> = self
            .0
            .iter()
            .filter(|r| r.property != rule.property)
            .cloned()
            .collect();
        rules.push(rule);
        SortState(rules)
    }
}

impl FromIterator<SortRule> for SortState {
    fn from_iter<I: IntoIterator<Item = SortRule>>(iter: I) -> Self {
        Self::new(iter)
    }
}

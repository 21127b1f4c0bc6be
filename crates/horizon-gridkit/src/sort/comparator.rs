//! Rule comparators.

use std::borrow::Cow;
use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::{Collation, SortDirection, SortProperty, SortRule, SortType};
use crate::model::{FieldPath, FieldValue, Record, RecordEntry};

/// Compares two records.
pub type Comparator<'a, T> = Box<dyn Fn(&RecordEntry<T>, &RecordEntry<T>) -> Ordering + 'a>;

/// Chain `rules` into one comparator.
///
/// Rules apply left to right; the first non-equal result wins. Values that
/// are missing or cannot be read as the rule's type always sort after
/// present ones, in either direction. An empty rule list compares
/// everything equal.
pub fn build_comparator<'a, T: Record>(rules: &[SortRule], collation: &'a Collation) -> Comparator<'a, T> {
    let chain: Vec<Comparator<'a, T>> = rules.iter().map(|rule| rule_comparator(rule, collation)).collect();
    Box::new(move |a, b| {
        chain
            .iter()
            .map(|cmp| cmp(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    })
}

fn rule_comparator<'a, T: Record>(rule: &SortRule, collation: &'a Collation) -> Comparator<'a, T> {
    let direction = rule.direction;
    let path = match &rule.property {
        SortProperty::InsertionOrder => {
            return Box::new(move |a, b| direction.apply(a.source_index.cmp(&b.source_index)));
        }
        SortProperty::Field(path) => path.clone(),
    };

    match rule.sort_type {
        SortType::String => Box::new(move |a, b| {
            missing_last(
                as_text(field(a, &path)),
                as_text(field(b, &path)),
                direction,
                |x, y| collation.compare(x, y),
            )
        }),
        SortType::Number => Box::new(move |a, b| {
            missing_last(
                as_number(&field(a, &path)),
                as_number(&field(b, &path)),
                direction,
                f64::total_cmp,
            )
        }),
        SortType::Date => Box::new(move |a, b| {
            missing_last(
                as_date(&field(a, &path)),
                as_date(&field(b, &path)),
                direction,
                i64::cmp,
            )
        }),
        SortType::Boolean => Box::new(move |a, b| {
            missing_last(
                as_bool(&field(a, &path)),
                as_bool(&field(b, &path)),
                direction,
                bool::cmp,
            )
        }),
    }
}

fn field<'r, T: Record>(entry: &'r RecordEntry<T>, path: &FieldPath) -> FieldValue<'r> {
    entry.value.field(path)
}

/// Orient present values by `direction` and put absent ones last.
fn missing_last<V>(
    a: Option<V>,
    b: Option<V>,
    direction: SortDirection,
    cmp: impl FnOnce(&V, &V) -> Ordering,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => direction.apply(cmp(&a, &b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn as_text(value: FieldValue<'_>) -> Option<Cow<'_, str>> {
    match value {
        FieldValue::Text(s) => Some(s),
        FieldValue::Number(n) => Some(Cow::Owned(n.to_string())),
        FieldValue::Bool(b) => Some(Cow::Owned(b.to_string())),
        FieldValue::Missing => None,
    }
}

fn as_number(value: &FieldValue<'_>) -> Option<f64> {
    let n = match value {
        FieldValue::Number(n) => *n,
        FieldValue::Text(s) => s.trim().parse::<f64>().ok()?,
        FieldValue::Bool(_) | FieldValue::Missing => return None,
    };
    (!n.is_nan()).then_some(n)
}

fn as_bool(value: &FieldValue<'_>) -> Option<bool> {
    match value {
        FieldValue::Bool(b) => Some(*b),
        FieldValue::Text(s) if s.eq_ignore_ascii_case("true") => Some(true),
        FieldValue::Text(s) if s.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

fn as_date(value: &FieldValue<'_>) -> Option<i64> {
    match value {
        FieldValue::Number(n) if n.is_finite() => Some(*n as i64),
        FieldValue::Text(s) => parse_date_millis(s),
        _ => None,
    }
}

/// Parse a date string to milliseconds since the Unix epoch.
///
/// Accepts RFC 3339, RFC 2822, `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD HH:MM:SS`
/// and bare `YYYY-MM-DD` (midnight UTC). Timestamps without an offset are
/// read as UTC.
pub fn parse_date_millis(text: &str) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.timestamp_millis());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().timestamp_millis())
}

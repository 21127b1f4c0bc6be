//! Filter and sort merge.

use std::collections::HashMap;

use horizon_gridkit_core::PerfSpan;
use horizon_gridkit_core::logging::{span_names, targets};
use indexmap::IndexSet;

use super::{Collation, SortRule, build_comparator};
use crate::model::{Key, Record, RecordEntry};

/// Relevance assumed for records without a score. Scores run from `0.0`
/// (best) to `1.0` (worst).
pub const MISSING_SCORE: f32 = 1.0;

/// Produce the visible ordering of `entries`.
///
/// 1. With `matching_keys`, only its members are kept; without it, all are.
/// 2. With non-empty `scores`, relevance (ascending score) becomes the
///    primary order and `rules` only break ties between equal scores.
/// 3. The combined comparator is applied with a stable sort.
///
/// The input is not modified, and running the result through again with the
/// same arguments yields the same order.
pub fn filter_and_sort<T: Record>(
    entries: &[RecordEntry<T>],
    matching_keys: Option<&IndexSet<Key>>,
    scores: Option<&HashMap<Key, f32>>,
    rules: &[SortRule],
    collation: &Collation,
) -> Vec<RecordEntry<T>> {
    let _perf = PerfSpan::new(span_names::PIPELINE);

    let mut visible: Vec<RecordEntry<T>> = entries
        .iter()
        .filter(|entry| matching_keys.is_none_or(|keys| keys.contains(&entry.key)))
        .cloned()
        .collect();

    let scores = scores.filter(|s| !s.is_empty());
    if rules.is_empty() && scores.is_none() {
        tracing::trace!(target: targets::SORT, kept = visible.len(), "filtered without sorting");
        return visible;
    }

    let by_rules = build_comparator(rules, collation);
    match scores {
        Some(scores) => {
            let score = |key: &Key| scores.get(key).copied().unwrap_or(MISSING_SCORE);
            visible.sort_by(|a, b| {
                score(&a.key)
                    .total_cmp(&score(&b.key))
                    .then_with(|| by_rules(a, b))
            });
        }
        None => visible.sort_by(|a, b| by_rules(a, b)),
    }

    tracing::trace!(
        target: targets::SORT,
        kept = visible.len(),
        total = entries.len(),
        rules = rules.len(),
        scored = scores.is_some(),
        "filtered and sorted"
    );
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::SortType;
    use serde_json::{Value, json};

    fn people() -> Vec<RecordEntry<Value>> {
        [("A", "Carol"), ("B", "Bob"), ("C", "Alice"), ("D", "Dave")]
            .into_iter()
            .enumerate()
            .map(|(i, (key, name))| RecordEntry::new(key, json!({ "name": name }), Some(name.to_string()), i))
            .collect()
    }

    fn same_order<T>(a: &[RecordEntry<T>], b: &[RecordEntry<T>]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.key == y.key)
    }

    fn keys(entries: &[RecordEntry<Value>]) -> Vec<String> {
        entries.iter().map(|e| e.key.to_string()).collect()
    }

    #[test]
    fn test_no_filter_no_rules_keeps_order() {
        let entries = people();
        let out = filter_and_sort(&entries, None, None, &[], &Collation::codepoint());
        assert_eq!(keys(&out), ["A", "B", "C", "D"]);
    }

    #[test]
    fn test_membership_filter() {
        let entries = people();
        let matching: IndexSet<Key> = ["D", "B"].into_iter().map(Key::from).collect();
        let out = filter_and_sort(&entries, Some(&matching), None, &[], &Collation::codepoint());
        assert_eq!(keys(&out), ["B", "D"]);

        let empty = IndexSet::new();
        assert!(filter_and_sort(&entries, Some(&empty), None, &[], &Collation::codepoint()).is_empty());
    }

    #[test]
    fn test_relevance_then_rules() {
        let entries = people();
        let scores: HashMap<Key, f32> = [("A", 0.5), ("B", 0.1), ("C", 0.5)]
            .into_iter()
            .map(|(k, s)| (Key::from(k), s))
            .collect();
        let matching: IndexSet<Key> = ["A", "B", "C"].into_iter().map(Key::from).collect();
        let collation = Collation::codepoint();

        let out = filter_and_sort(&entries, Some(&matching), Some(&scores), &[], &collation);
        assert_eq!(keys(&out), ["B", "A", "C"]);

        let rules = [SortRule::ascending("name", SortType::String)];
        let out = filter_and_sort(&entries, Some(&matching), Some(&scores), &rules, &collation);
        // Alice (C) and Carol (A) tie on score; name order decides.
        assert_eq!(keys(&out), ["B", "C", "A"]);
    }

    #[test]
    fn test_missing_score_is_worst() {
        let entries = people();
        let scores: HashMap<Key, f32> = [(Key::from("D"), 0.9)].into_iter().collect();
        let out = filter_and_sort(&entries, None, Some(&scores), &[], &Collation::codepoint());
        assert_eq!(keys(&out), ["D", "A", "B", "C"]);
    }

    #[test]
    fn test_empty_scores_ignored() {
        let entries = people();
        let rules = [SortRule::descending("name", SortType::String)];
        let out = filter_and_sort(&entries, None, Some(&HashMap::new()), &rules, &Collation::codepoint());
        assert_eq!(keys(&out), ["D", "A", "B", "C"]);
    }

    #[test]
    fn test_idempotent_and_input_untouched() {
        let entries = people();
        let rules = [SortRule::ascending("name", SortType::String)];
        let collation = Collation::codepoint();
        let once = filter_and_sort(&entries, None, None, &rules, &collation);
        let twice = filter_and_sort(&once, None, None, &rules, &collation);
        assert!(same_order(&once, &twice));
        assert_eq!(keys(&entries), ["A", "B", "C", "D"]);
    }
}

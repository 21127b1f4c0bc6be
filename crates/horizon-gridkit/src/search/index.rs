//! Default fuzzy index.

use std::collections::HashMap;

use horizon_gridkit_core::PerfSpan;
use horizon_gridkit_core::logging::{span_names, targets};
use nucleo_matcher::pattern::{CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32String};

use super::{SearchDocument, SearchError, SearchIndex, SearchResults};
use crate::model::Key;

/// Fuzzy matcher over record text, backed by `nucleo-matcher`.
///
/// Matcher scores grow with match quality; they are normalised per query so
/// the best match scores `0.0` and scores approach `1.0` as matches get
/// weaker.
pub struct FuzzyIndex {
    documents: Vec<(Key, Utf32String)>,
}

impl FuzzyIndex {
    pub fn build(documents: Vec<SearchDocument>) -> Self {
        let _perf = PerfSpan::new(span_names::INDEX);
        let documents: Vec<(Key, Utf32String)> = documents
            .into_iter()
            .map(|doc| (doc.key, Utf32String::from(doc.text)))
            .collect();
        tracing::debug!(target: targets::SEARCH, documents = documents.len(), "fuzzy index built");
        Self { documents }
    }
}

impl SearchIndex for FuzzyIndex {
    fn search(&self, query: &str) -> Result<SearchResults, SearchError> {
        let _perf = PerfSpan::new(span_names::SEARCH);
        let mut matcher = Matcher::new(Config::DEFAULT);
        let pattern = Pattern::parse(query, CaseMatching::Ignore, Normalization::Smart);

        let mut matches: Vec<(&Key, u32)> = self
            .documents
            .iter()
            .filter_map(|(key, text)| pattern.score(text.slice(..), &mut matcher).map(|score| (key, score)))
            .collect();
        // Stable, so equal scores keep index order.
        matches.sort_by(|a, b| b.1.cmp(&a.1));

        let best = matches.first().map_or(0, |&(_, score)| score);
        let mut scores = HashMap::with_capacity(matches.len());
        for &(key, score) in &matches {
            let normalised = if best == 0 {
                0.0
            } else {
                (1.0 - score as f32 / best as f32).clamp(0.0, 1.0)
            };
            scores.insert(key.clone(), normalised);
        }

        tracing::trace!(target: targets::SEARCH, query, matches = matches.len(), "fuzzy search");
        Ok(SearchResults {
            matching_keys: matches.into_iter().map(|(key, _)| key.clone()).collect(),
            scores,
        })
    }

    fn len(&self) -> usize {
        self.documents.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> FuzzyIndex {
        FuzzyIndex::build(vec![
            SearchDocument::new("readme", "README.md"),
            SearchDocument::new("main", "src/main.rs"),
            SearchDocument::new("lib", "src/lib.rs"),
            SearchDocument::new("cargo", "Cargo.toml"),
        ])
    }

    #[test]
    fn test_matches_and_ranking() {
        let results = index().search("main").unwrap();
        assert_eq!(results.matching_keys.first(), Some(&Key::from("main")));
        assert_eq!(results.scores.get(&Key::from("main")), Some(&0.0));
        assert!(!results.scores.contains_key(&Key::from("cargo")));
    }

    #[test]
    fn test_case_insensitive() {
        let results = index().search("readme").unwrap();
        assert_eq!(results.matching_keys, vec![Key::from("readme")]);
    }

    #[test]
    fn test_no_matches() {
        let results = index().search("zzzz").unwrap();
        assert_eq!(results.match_count(), 0);
        assert!(results.scores.is_empty());
    }

    #[test]
    fn test_scores_are_normalised() {
        let results = index().search("rs").unwrap();
        assert!(results.match_count() >= 2);
        assert!(results.scores.values().all(|s| (0.0..=1.0).contains(s)));
        let first = &results.matching_keys[0];
        assert_eq!(results.scores[first], 0.0);
    }

    #[test]
    fn test_len() {
        assert_eq!(index().len(), 4);
        assert!(FuzzyIndex::build(Vec::new()).is_empty());
    }
}

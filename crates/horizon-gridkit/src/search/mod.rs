//! Background text search.
//!
//! Search is supplementary: it narrows and ranks what the sort pipeline
//! shows, but never blocks selection or navigation. Queries and index
//! rebuilds run on a dedicated [`Worker`](horizon_gridkit_core::Worker)
//! owned by a [`SearchController`], and results come back through
//! [`SearchController::poll`].
//!
//! A [`FilterState`] distinguishes "no filter" (`matching_keys == None`)
//! from "a filter that matched nothing" (`Some` of an empty set, count 0).

mod controller;
mod index;

use std::collections::HashMap;

use indexmap::IndexSet;

pub use controller::{IndexFactory, SearchConfig, SearchController};
pub use index::FuzzyIndex;

use crate::model::Key;

/// Text indexed for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchDocument {
    pub key: Key,
    pub text: String,
}

impl SearchDocument {
    pub fn new(key: impl Into<Key>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
        }
    }
}

/// What one query matched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    /// Matching keys, best match first.
    pub matching_keys: Vec<Key>,
    /// Relevance per matching key; `0.0` is best, `1.0` worst.
    pub scores: HashMap<Key, f32>,
}

impl SearchResults {
    /// No matches.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn match_count(&self) -> usize {
        self.matching_keys.len()
    }
}

/// Search failures. These never reach callers of the controller; they are
/// logged and treated as "no results".
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    #[error("search index is not built")]
    IndexNotBuilt,
    #[error("index build failed: {0}")]
    Index(String),
    #[error("query failed: {0}")]
    Query(String),
    #[error("search task panicked: {0}")]
    Panicked(String),
}

/// A searchable index over record text.
pub trait SearchIndex: Send + Sync + 'static {
    /// Run `query`, returning matches best first.
    fn search(&self, query: &str) -> Result<SearchResults, SearchError>;

    /// Number of indexed documents.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The search half of a collection view's state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    /// The query as last typed.
    pub query: String,
    /// The query last submitted for search.
    pub debounced_query: String,
    /// A query is outstanding.
    pub is_filtering: bool,
    /// An index rebuild is outstanding.
    pub is_indexing: bool,
    /// Members of the active filter; `None` when no filter applies.
    pub matching_keys: Option<IndexSet<Key>>,
    pub match_count: Option<usize>,
    pub scores: Option<HashMap<Key, f32>>,
}

impl FilterState {
    /// Whether a filter currently restricts the visible records.
    pub fn is_active(&self) -> bool {
        self.matching_keys.is_some()
    }

    /// Drop results and query progress, keeping the typed query.
    pub(crate) fn clear_results(&mut self) {
        self.debounced_query.clear();
        self.is_filtering = false;
        self.matching_keys = None;
        self.match_count = None;
        self.scores = None;
    }

    /// Apply one query's results as a unit.
    pub(crate) fn apply_results(&mut self, results: SearchResults) {
        self.match_count = Some(results.match_count());
        self.matching_keys = Some(results.matching_keys.into_iter().collect());
        self.scores = Some(results.scores);
        self.is_filtering = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleared_differs_from_empty_match() {
        let mut state = FilterState::default();
        state.apply_results(SearchResults::empty());
        assert!(state.is_active());
        assert_eq!(state.match_count, Some(0));
        assert_eq!(state.matching_keys.as_ref().map(IndexSet::len), Some(0));

        state.clear_results();
        assert!(!state.is_active());
        assert_eq!(state.match_count, None);
        assert_eq!(state.scores, None);
    }
}

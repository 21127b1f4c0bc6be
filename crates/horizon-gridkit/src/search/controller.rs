//! Debounced, last-query-wins search on a background worker.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use horizon_gridkit_core::logging::targets;
use horizon_gridkit_core::{RequestSequence, RequestToken, Worker, WorkerConfig};

use super::{FilterState, FuzzyIndex, SearchDocument, SearchError, SearchIndex, SearchResults};

/// Builds a search index from documents. Runs on the worker thread.
pub type IndexFactory =
    Arc<dyn Fn(Vec<SearchDocument>) -> Result<Arc<dyn SearchIndex>, SearchError> + Send + Sync>;

/// Controller settings.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before a query is issued.
    pub debounce: Duration,
    /// Queries shorter than this (in characters, after trimming) clear the
    /// filter instead of searching.
    pub min_query_length: usize,
    /// The search worker thread.
    pub worker: WorkerConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(150),
            min_query_length: 1,
            worker: WorkerConfig::with_name("gridkit-search"),
        }
    }
}

enum SearchResponse {
    Indexed {
        generation: u64,
        result: Result<Arc<dyn SearchIndex>, SearchError>,
    },
    Searched {
        generation: u64,
        results: SearchResults,
    },
}

/// Owns the search worker and the [`FilterState`] it feeds.
///
/// The controller is driven by its owner:
///
/// - [`set_query`](Self::set_query) on every keystroke;
/// - [`tick`](Self::tick) from the frame or timer loop to fire debounced
///   queries;
/// - [`poll`](Self::poll) to apply finished work. A `true` return means the
///   filter results changed and the sort pipeline must re-run.
///
/// Only the most recently submitted query can change the filter state;
/// responses to superseded queries are dropped. Queries submitted while an
/// index rebuild is pending are held and issued once the new index lands.
pub struct SearchController {
    config: SearchConfig,
    worker: Worker<SearchResponse>,
    factory: IndexFactory,
    index: Option<Arc<dyn SearchIndex>>,
    sender: Sender<SearchResponse>,
    responses: Receiver<SearchResponse>,
    queries: RequestSequence,
    index_generation: u64,
    pending: Option<(String, Instant)>,
    held: Option<String>,
    state: FilterState,
}

impl SearchController {
    /// A controller using [`FuzzyIndex`].
    pub fn new(config: SearchConfig) -> horizon_gridkit_core::Result<Self> {
        let factory: IndexFactory =
            Arc::new(|documents| Ok(Arc::new(FuzzyIndex::build(documents)) as Arc<dyn SearchIndex>));
        Self::with_index_factory(config, factory)
    }

    /// A controller using a custom index.
    pub fn with_index_factory(config: SearchConfig, factory: IndexFactory) -> horizon_gridkit_core::Result<Self> {
        let worker = Worker::with_config(config.worker.clone())?;
        let (sender, responses) = unbounded();
        Ok(Self {
            config,
            worker,
            factory,
            index: None,
            sender,
            responses,
            queries: RequestSequence::new(),
            index_generation: 0,
            pending: None,
            held: None,
            state: FilterState::default(),
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.state
    }

    /// Whether an index rebuild or a query is outstanding.
    pub fn is_busy(&self) -> bool {
        self.state.is_filtering || self.state.is_indexing
    }

    /// Whether a debounced query is waiting for its quiet period.
    pub fn has_pending_query(&self) -> bool {
        self.pending.is_some()
    }

    fn is_searchable(&self, query: &str) -> bool {
        let query = query.trim();
        !query.is_empty() && query.chars().count() >= self.config.min_query_length
    }

    /// Record a query change at `now`.
    ///
    /// A query below the minimum length clears the filter immediately and
    /// supersedes any outstanding query; the return value is `true` when that
    /// removed an active filter. Otherwise the query is scheduled for
    /// `now + debounce` and `false` is returned.
    pub fn set_query(&mut self, query: &str, now: Instant) -> bool {
        self.state.query = query.to_string();

        if !self.is_searchable(query) {
            let was_active = self.state.is_active();
            self.pending = None;
            self.held = None;
            self.queries.invalidate();
            self.state.clear_results();
            tracing::debug!(target: targets::SEARCH, query, "query below minimum length, filter cleared");
            return was_active;
        }

        self.pending = Some((query.to_string(), now + self.config.debounce));
        false
    }

    /// Issue the debounced query once its quiet period has passed.
    ///
    /// Returns `true` if a query was submitted.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.pending.take() {
            Some((query, due)) if due <= now => {
                self.submit(query);
                true
            }
            other => {
                self.pending = other;
                false
            }
        }
    }

    /// Rebuild the index from `documents` in the background.
    pub fn rebuild_index(&mut self, documents: Vec<SearchDocument>) {
        self.index_generation += 1;
        let generation = self.index_generation;
        let factory = Arc::clone(&self.factory);
        let sender = self.sender.clone();
        let count = documents.len();

        let task = move || {
            let result = match panic::catch_unwind(AssertUnwindSafe(|| factory(documents))) {
                Ok(result) => result,
                Err(payload) => Err(SearchError::Panicked(panic_message(payload.as_ref()))),
            };
            SearchResponse::Indexed { generation, result }
        };
        let queued = self.worker.send_with_callback(task, move |response| {
            let _ = sender.send(response);
        });

        if queued {
            self.state.is_indexing = true;
            tracing::debug!(target: targets::SEARCH, generation, documents = count, "index rebuild queued");
        } else {
            tracing::warn!(target: targets::SEARCH, generation, "search worker unavailable, index not rebuilt");
        }
    }

    fn submit(&mut self, query: String) {
        self.state.debounced_query = query.clone();
        self.state.is_filtering = true;

        if self.state.is_indexing {
            // Anything in flight ran against the old index.
            self.queries.invalidate();
            tracing::trace!(target: targets::SEARCH, query, "query held until index is ready");
            self.held = Some(query);
            return;
        }

        let token = self.queries.issue();
        let generation = token.generation();
        let index = self.index.clone();
        let sender = self.sender.clone();
        let task = move || SearchResponse::Searched {
            generation,
            results: run_query(index, &query, &token),
        };
        let queued = self.worker.send_with_callback(task, move |response| {
            let _ = sender.send(response);
        });

        if queued {
            tracing::trace!(target: targets::SEARCH, generation, "query submitted");
        } else {
            tracing::warn!(target: targets::SEARCH, "search worker unavailable, treating query as unmatched");
            self.state.apply_results(SearchResults::empty());
        }
    }

    /// Apply finished work without blocking.
    ///
    /// Returns `true` when the filter results changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(response) = self.responses.try_recv() {
            changed |= self.apply(response);
        }
        changed
    }

    /// Like [`poll`](Self::poll), but wait up to `timeout` for outstanding
    /// work to finish.
    pub fn poll_timeout(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut changed = self.poll();
        while self.is_busy() {
            match self.responses.recv_deadline(deadline) {
                Ok(response) => changed |= self.apply(response),
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        changed
    }

    fn apply(&mut self, response: SearchResponse) -> bool {
        match response {
            SearchResponse::Indexed { generation, result } => {
                if generation != self.index_generation {
                    tracing::trace!(target: targets::SEARCH, generation, "stale index discarded");
                    return false;
                }
                self.state.is_indexing = false;
                self.index = match result {
                    Ok(index) => {
                        tracing::debug!(target: targets::SEARCH, generation, documents = index.len(), "index ready");
                        Some(index)
                    }
                    Err(err) => {
                        tracing::warn!(target: targets::SEARCH, %err, "index build failed, searches will find nothing");
                        None
                    }
                };

                // Re-run the live query so results reflect the new records.
                let query = self.held.take().or_else(|| {
                    (self.state.is_active() && self.is_searchable(&self.state.debounced_query))
                        .then(|| self.state.debounced_query.clone())
                });
                if let Some(query) = query {
                    self.submit(query);
                }
                false
            }
            SearchResponse::Searched { generation, results } => {
                if !self.queries.is_current_generation(generation) {
                    tracing::trace!(target: targets::SEARCH, generation, "stale results discarded");
                    return false;
                }
                tracing::debug!(target: targets::SEARCH, generation, matches = results.match_count(), "results applied");
                self.state.apply_results(results);
                true
            }
        }
    }

    /// Stop the worker and wait for it to exit.
    pub fn shutdown(&self) {
        self.worker.stop_and_join();
    }
}

fn run_query(index: Option<Arc<dyn SearchIndex>>, query: &str, token: &RequestToken) -> SearchResults {
    if token.is_cancelled() {
        return SearchResults::empty();
    }
    let outcome = match index {
        Some(index) => match panic::catch_unwind(AssertUnwindSafe(|| index.search(query))) {
            Ok(outcome) => outcome,
            Err(payload) => Err(SearchError::Panicked(panic_message(payload.as_ref()))),
        },
        None => Err(SearchError::IndexNotBuilt),
    };
    outcome.unwrap_or_else(|err| {
        tracing::warn!(target: targets::SEARCH, %err, query, "search failed, treating as no results");
        SearchResults::empty()
    })
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

static_assertions::assert_impl_all!(SearchController: Send);

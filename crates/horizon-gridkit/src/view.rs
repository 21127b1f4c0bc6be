//! Per-instance collection state.
//!
//! [`CollectionView`] wires the engine together:
//!
//! ```text
//! records -> key/text extraction -> filter + sort -> Collection -> layout -> visible window
//!                                     ^                  |
//!                              search results        selection / focus
//! ```
//!
//! Every change to records, sort rules or filter results rebuilds the
//! [`Collection`] snapshot and hands it to the selection manager, which
//! prunes keys that disappeared. Layout is re-run whenever a container width
//! is known.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use horizon_gridkit_core::logging::targets;
use horizon_gridkit_core::{Result, Signal};
use indexmap::IndexSet;

use crate::config::GridkitConfig;
use crate::geometry::{Rect, Size};
use crate::layout::{
    CollectionLayout, Layout, LayoutError, Measurement, MeasurementInfo,
    MeasurementInvalidator, Row, Viewport, VisibleWindow, visible_window,
};
use crate::model::{
    Collection, Key, Record, RecordEntry, SelectedKeys, SelectionManager, SelectionMode,
    SelectionModifiers,
};
use crate::navigation::{
    Direction, GridKeyboardDelegate, KeyboardDelegate, ListKeyboardDelegate, NavigationContext,
    PageMetrics, SpatialKeyboardDelegate, navigate,
};
use crate::search::{FilterState, IndexFactory, SearchController, SearchDocument};
use crate::sort::{Collation, SortProperty, SortRule, SortState, SortType, filter_and_sort};

type AppliedFilter = (Option<IndexSet<Key>>, Option<HashMap<Key, f32>>);

/// A list or grid over records of type `T`, minus the rendering.
pub struct CollectionView<T: Record> {
    config: GridkitConfig,
    entries: Vec<RecordEntry<T>>,
    sort: SortState,
    collation: Collation,
    layout: Layout,
    invalidator: MeasurementInvalidator,
    viewport_height: f32,
    selection: SelectionManager<T>,
    search: SearchController,
    /// Filter results the current collection was built from.
    applied_filter: AppliedFilter,

    /// Emitted with the new rules after the sort order changed.
    pub sort_changed: Signal<SortState>,
    /// Emitted with the typed query when it changes.
    pub filter_changed: Signal<String>,
    /// Emitted with the matching keys and match count after filter results
    /// were applied. `None` means no filter is active.
    pub filter_results_changed: Signal<(Option<Vec<Key>>, Option<usize>)>,
}

impl<T: Record> CollectionView<T> {
    /// An empty view using the default fuzzy index.
    pub fn new(config: GridkitConfig) -> Result<Self> {
        config.validate()?;
        let search = SearchController::new(config.search.search_config())?;
        Ok(Self::assemble(config, search))
    }

    /// An empty view whose search index is built by `factory`.
    pub fn with_index_factory(config: GridkitConfig, factory: IndexFactory) -> Result<Self> {
        config.validate()?;
        let search = SearchController::with_index_factory(config.search.search_config(), factory)?;
        Ok(Self::assemble(config, search))
    }

    fn assemble(config: GridkitConfig, search: SearchController) -> Self {
        let collation = Collation::for_locale(&config.locale);
        let layout = config.layout.build_layout();
        let invalidator = MeasurementInvalidator::new(config.layout.width_noise_threshold);
        let selection = SelectionManager::with_state(Arc::new(Collection::new()), config.selection.initial_state());
        tracing::debug!(
            target: targets::VIEW,
            layout = ?layout.kind(),
            locale = %config.locale,
            "collection view created"
        );
        Self {
            sort: config.sort.clone(),
            config,
            entries: Vec::new(),
            collation,
            layout,
            invalidator,
            viewport_height: 0.0,
            selection,
            search,
            applied_filter: (None, None),
            sort_changed: Signal::new(),
            filter_changed: Signal::new(),
            filter_results_changed: Signal::new(),
        }
    }

    pub fn config(&self) -> &GridkitConfig {
        &self.config
    }

    // =========================================================================
    // Records
    // =========================================================================

    /// Replace the records.
    ///
    /// `key_of` identifies each record and `text_of` supplies the text used
    /// for type-ahead and search. A record whose key was already seen is
    /// dropped from the collection.
    pub fn set_records<I, K, X>(&mut self, records: I, key_of: K, text_of: X)
    where
        I: IntoIterator<Item = T>,
        K: Fn(&T) -> Key,
        X: Fn(&T) -> Option<String>,
    {
        let entries = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                let key = key_of(&record);
                let text = text_of(&record);
                RecordEntry::new(key, record, text, index)
            })
            .collect();
        self.set_entries(entries);
    }

    /// Replace the records with already extracted entries.
    pub fn set_entries(&mut self, entries: Vec<RecordEntry<T>>) {
        tracing::debug!(target: targets::VIEW, records = entries.len(), "records replaced");
        let documents = entries
            .iter()
            .map(|entry| {
                let text = entry.text_value.clone().unwrap_or_else(|| entry.key.to_string());
                SearchDocument::new(entry.key.clone(), text)
            })
            .collect();
        self.entries = entries;
        self.search.rebuild_index(documents);
        self.refresh();
    }

    /// Ingested entries in source order.
    pub fn entries(&self) -> &[RecordEntry<T>] {
        &self.entries
    }

    /// The visible collection snapshot.
    pub fn collection(&self) -> &Arc<Collection<T>> {
        self.selection.collection()
    }

    /// Visible keys in display order.
    pub fn keys(&self) -> Vec<Key> {
        self.collection().keys().cloned().collect()
    }

    fn refresh(&mut self) {
        let filter = self.search.filter_state();
        let visible = filter_and_sort(
            &self.entries,
            filter.matching_keys.as_ref(),
            filter.scores.as_ref(),
            self.sort.rules(),
            &self.collation,
        );
        self.selection.set_collection(Arc::new(Collection::from_entries(visible)));
        self.relayout();
    }

    fn relayout(&mut self) {
        if let Some(width) = self.invalidator.committed_width() {
            let keys = self.keys();
            self.layout.update(&keys, width);
        }
    }

    // =========================================================================
    // Layout and virtualization
    // =========================================================================

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The rectangle of `key`; `None` until a container width is known.
    pub fn layout_info(&self, key: &Key) -> Option<Rect> {
        self.layout.layout_info(key)
    }

    pub fn rows(&self) -> &[Row] {
        self.layout.rows()
    }

    pub fn content_size(&self) -> Size {
        self.layout.content_size()
    }

    /// Rows to render for a scroll position, including overscan.
    pub fn visible_window(&self, scroll_top: f32, height: f32) -> VisibleWindow {
        visible_window(
            self.layout.rows(),
            Viewport::new(scroll_top, height),
            self.config.layout.overscan_rows,
        )
    }

    /// Keys of the rows in [`visible_window`](Self::visible_window).
    pub fn visible_keys(&self, scroll_top: f32, height: f32) -> Vec<Key> {
        self.visible_window(scroll_top, height)
            .keys(self.layout.rows())
            .cloned()
            .collect()
    }

    /// Record the viewport height used for page navigation.
    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport_height = height.max(0.0);
    }

    /// Report the container width.
    ///
    /// Changes within the noise threshold are ignored. A real change drops
    /// every cached measurement, re-lays out with estimates and returns
    /// `true`; the renderer should then measure again.
    pub fn set_container_width(&mut self, width: f32) -> bool {
        if !self.invalidator.observe_width(width) {
            return false;
        }
        tracing::debug!(target: targets::VIEW, width, "container width committed");
        self.layout = self.config.layout.build_layout();
        self.relayout();
        true
    }

    /// Report the measured size of a reference element. A change means font
    /// or zoom scale moved and every item must be measured again.
    pub fn set_scale_probe(&mut self, size: Size) -> bool {
        if !self.invalidator.observe_probe(size) {
            return false;
        }
        tracing::debug!(target: targets::VIEW, ?size, "scale probe changed");
        self.layout = self.config.layout.build_layout();
        self.relayout();
        true
    }

    /// Whether every item should be measured again.
    pub fn needs_measurement(&self) -> bool {
        self.invalidator.needs_full_remeasure()
    }

    /// What the renderer should measure.
    pub fn measurement_info(&self) -> MeasurementInfo {
        self.layout.measurement_info(None)
    }

    /// Apply measured sizes from the renderer.
    pub fn apply_measurements(&mut self, measurements: &HashMap<Key, Measurement>) -> std::result::Result<(), LayoutError> {
        self.layout.update_with_measurements(measurements)?;
        self.invalidator.clear();
        Ok(())
    }

    // =========================================================================
    // Sorting
    // =========================================================================

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    /// Column-header click: flip the primary rule or make `property` primary.
    pub fn sort_by(&mut self, property: impl Into<SortProperty>, sort_type: SortType) {
        let next = self.sort.toggled(property, sort_type);
        self.set_sort(next);
    }

    /// Replace the sort rules. Setting the current rules again does nothing.
    pub fn set_sort(&mut self, sort: SortState) {
        if sort == self.sort {
            return;
        }
        tracing::debug!(target: targets::VIEW, rules = sort.rules().len(), "sort changed");
        self.sort = sort;
        self.refresh();
        self.sort_changed.emit(self.sort.clone());
    }

    /// Add `rule` as the lowest-priority tiebreaker.
    pub fn add_sort_rule(&mut self, rule: SortRule) {
        let next = self.sort.with_rule(rule);
        self.set_sort(next);
    }

    /// Drop every rule, restoring source order.
    pub fn clear_sort(&mut self) {
        self.set_sort(SortState::default());
    }

    // =========================================================================
    // Search
    // =========================================================================

    pub fn filter_state(&self) -> &FilterState {
        self.search.filter_state()
    }

    /// Record a query change at `now`. Short queries clear the filter at
    /// once; others are issued by [`tick`](Self::tick) after the debounce.
    pub fn set_query(&mut self, query: &str, now: Instant) {
        if self.search.filter_state().query == query {
            return;
        }
        self.search.set_query(query, now);
        self.filter_changed.emit(query.to_string());
        self.sync_filter();
    }

    /// Issue a debounced query whose quiet period has passed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let submitted = self.search.tick(now);
        self.sync_filter();
        submitted
    }

    /// Apply finished search work. Returns `true` if the visible records
    /// changed.
    pub fn poll_search(&mut self) -> bool {
        self.search.poll();
        self.sync_filter()
    }

    /// Like [`poll_search`](Self::poll_search), waiting up to `timeout` for
    /// outstanding work.
    pub fn poll_search_timeout(&mut self, timeout: Duration) -> bool {
        self.search.poll_timeout(timeout);
        self.sync_filter()
    }

    fn sync_filter(&mut self) -> bool {
        let state = self.search.filter_state();
        if state.matching_keys == self.applied_filter.0 && state.scores == self.applied_filter.1 {
            return false;
        }
        let matching = state.matching_keys.as_ref().map(|keys| keys.iter().cloned().collect());
        let count = state.match_count;
        self.applied_filter = (state.matching_keys.clone(), state.scores.clone());

        self.refresh();
        tracing::debug!(target: targets::VIEW, matches = ?count, "filter results applied");
        self.filter_results_changed.emit((matching, count));
        true
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// A keyboard delegate matching the layout.
    ///
    /// Lists navigate linearly and auto-column grids by column arithmetic.
    /// Inline grids, fixed or wrapping, navigate spatially over the
    /// laid-out rectangles since their last row may be short.
    pub fn keyboard_delegate(&self) -> Box<dyn KeyboardDelegate + '_> {
        let ctx = NavigationContext::new(self.collection().as_ref(), self.selection.navigation_disabled_keys());
        let page = (self.viewport_height > 0.0).then(|| PageMetrics {
            rects: &self.layout,
            page_height: self.viewport_height,
        });

        match &self.layout {
            Layout::List(_) => {
                let delegate = ListKeyboardDelegate::new(ctx);
                Box::new(match page {
                    Some(page) => delegate.with_page(page),
                    None => delegate,
                })
            }
            Layout::Grid(grid) => {
                let delegate = GridKeyboardDelegate::new(ctx, grid.columns() as i64);
                Box::new(match page {
                    Some(page) => delegate.with_page(page),
                    None => delegate,
                })
            }
            Layout::InlineGrid(_) => Box::new(SpatialKeyboardDelegate::new(ctx, &self.layout)),
        }
    }

    /// Move focus one step in `direction`.
    ///
    /// With `extend`, the selection range grows from its anchor to the new
    /// key. Returns the newly focused key.
    pub fn move_focus(&mut self, direction: Direction, extend: bool) -> Option<Key> {
        let target = {
            let delegate = self.keyboard_delegate();
            navigate(delegate.as_ref(), self.selection.focused_key(), direction)
        }?;
        tracing::trace!(target: targets::VIEW, ?direction, key = %target, extend, "focus moved");

        if extend {
            self.selection.extend_selection(target.clone());
        }
        let strategy = self.selection.child_focus_strategy();
        self.selection.set_focused_key(Some(target.clone()), strategy);
        Some(target)
    }

    /// Type-ahead: focus the next item whose text starts with `text`.
    pub fn focus_by_text(&mut self, text: &str) -> Option<Key> {
        let target = {
            let delegate = self.keyboard_delegate();
            delegate.key_for_search(text, self.selection.focused_key())
        }?;
        let strategy = self.selection.child_focus_strategy();
        self.selection.set_focused_key(Some(target.clone()), strategy);
        Some(target)
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn selection(&self) -> &SelectionManager<T> {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionManager<T> {
        &mut self.selection
    }

    /// Emitted with the new selection after every effective change.
    pub fn selection_changed(&self) -> &Signal<SelectedKeys> {
        &self.selection.selection_changed
    }

    /// Emitted with the new focused key when it changes.
    pub fn focus_changed(&self) -> &Signal<Option<Key>> {
        &self.selection.focus_changed
    }

    pub fn selected_keys(&self) -> Vec<Key> {
        self.selection.selected_keys()
    }

    pub fn is_selected(&self, key: &Key) -> bool {
        self.selection.is_selected(key)
    }

    pub fn focused_key(&self) -> Option<&Key> {
        self.selection.focused_key()
    }

    pub fn set_focused_key(&mut self, key: Option<Key>) {
        let strategy = self.selection.child_focus_strategy();
        self.selection.set_focused_key(key, strategy);
    }

    pub fn select(&mut self, key: Key, modifiers: SelectionModifiers) {
        self.selection.select(key, modifiers);
    }

    pub fn toggle_selection(&mut self, key: Key) {
        self.selection.toggle_selection(key);
    }

    pub fn replace_selection(&mut self, key: Key) {
        self.selection.replace_selection(key);
    }

    pub fn extend_selection(&mut self, to: Key) {
        self.selection.extend_selection(to);
    }

    pub fn select_range(&mut self, from: Key, to: Key) {
        self.selection.select_range(from, to);
    }

    pub fn select_all(&mut self) {
        self.selection.select_all();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear_selection();
    }

    pub fn set_selected_keys<I: IntoIterator<Item = Key>>(&mut self, keys: I) {
        self.selection.set_selected_keys(keys);
    }

    pub fn set_disabled_keys<I: IntoIterator<Item = Key>>(&mut self, keys: I) {
        self.selection.set_disabled_keys(keys);
    }

    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.selection.set_selection_mode(mode);
    }

    /// Stop the search worker and wait for it to exit.
    pub fn shutdown(&self) {
        self.search.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutKind;
    use crate::sort::SortDirection;
    use parking_lot::Mutex;
    use serde_json::{Value, json};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn people() -> Vec<Value> {
        [("a", "Carol", 31), ("b", "Bob", 25), ("c", "Alice", 40), ("d", "Dave", 25)]
            .into_iter()
            .map(|(id, name, age)| json!({ "id": id, "name": name, "age": age }))
            .collect()
    }

    fn view_with(config: GridkitConfig) -> CollectionView<Value> {
        let mut view = CollectionView::new(config).unwrap();
        view.set_records(
            people(),
            |r: &Value| Key::from(r["id"].as_str().unwrap_or_default()),
            |r: &Value| r["name"].as_str().map(str::to_string),
        );
        view
    }

    fn keys(view: &CollectionView<Value>) -> Vec<String> {
        view.keys().iter().map(ToString::to_string).collect()
    }

    fn k(s: &str) -> Key {
        Key::from(s)
    }

    #[test]
    fn test_records_in_source_order() {
        let view = view_with(GridkitConfig::default());
        assert_eq!(keys(&view), ["a", "b", "c", "d"]);
        assert_eq!(view.entries().len(), 4);
        assert!(view.layout_info(&k("a")).is_none());
        view.shutdown();
    }

    #[test]
    fn test_sort_by_toggles_and_emits() {
        let mut view = view_with(GridkitConfig::default());
        let emitted = Arc::new(Mutex::new(Vec::new()));
        let probe = emitted.clone();
        view.sort_changed.connect(move |state: &SortState| probe.lock().push(state.clone()));

        view.sort_by("name", SortType::String);
        assert_eq!(keys(&view), ["c", "b", "a", "d"]);

        view.sort_by("name", SortType::String);
        assert_eq!(keys(&view), ["d", "a", "b", "c"]);
        assert_eq!(view.sort_state().primary().map(|r| r.direction), Some(SortDirection::Desc));

        let current = view.sort_state().clone();
        view.set_sort(current);
        assert_eq!(emitted.lock().len(), 2);
        view.shutdown();
    }

    #[test]
    fn test_tiebreaker_rule() {
        let mut view = view_with(GridkitConfig::default());
        view.sort_by("age", SortType::Number);
        view.add_sort_rule(SortRule::descending("name", SortType::String));
        // Bob and Dave tie on age.
        assert_eq!(keys(&view), ["d", "b", "a", "c"]);

        view.clear_sort();
        assert_eq!(keys(&view), ["a", "b", "c", "d"]);
        view.shutdown();
    }

    #[test]
    fn test_list_layout_and_window() {
        let mut config = GridkitConfig::default();
        config.layout.estimated_item_height = 50.0;
        config.layout.overscan_rows = 0;
        let mut view = view_with(config);

        assert!(view.set_container_width(400.0));
        assert!(view.needs_measurement());
        assert_eq!(view.rows().len(), 4);
        assert_eq!(view.layout_info(&k("b")).map(|r| r.origin.y), Some(50.0));
        assert_eq!(view.visible_keys(60.0, 30.0), vec![k("b")]);

        // Noise does not re-lay out.
        assert!(!view.set_container_width(401.0));

        let measured: HashMap<Key, Measurement> = [(k("a"), Measurement::Height(80.0))].into_iter().collect();
        view.apply_measurements(&measured).unwrap();
        assert!(!view.needs_measurement());
        assert_eq!(view.layout_info(&k("b")).map(|r| r.origin.y), Some(80.0));
        view.shutdown();
    }

    #[test]
    fn test_width_change_invalidates_measurements() {
        let mut config = GridkitConfig::default();
        config.layout.estimated_item_height = 50.0;
        let mut view = view_with(config);
        view.set_container_width(400.0);
        let measured: HashMap<Key, Measurement> = [(k("a"), Measurement::Height(80.0))].into_iter().collect();
        view.apply_measurements(&measured).unwrap();

        assert!(view.set_container_width(300.0));
        assert!(view.needs_measurement());
        assert_eq!(view.layout_info(&k("b")).map(|r| r.origin.y), Some(50.0));
        view.shutdown();
    }

    #[test]
    fn test_grid_navigation() {
        let config = GridkitConfig::default()
            .with_layout_kind(LayoutKind::Grid)
            .with_min_item_width(100.0)
            .with_selection_mode(SelectionMode::Multiple);
        let mut view = view_with(config);
        view.set_container_width(300.0);

        assert_eq!(view.move_focus(Direction::Down, false), Some(k("a")));
        assert_eq!(view.move_focus(Direction::Down, false), Some(k("d")));
        assert_eq!(view.move_focus(Direction::Down, false), None);
        assert_eq!(view.focused_key(), Some(&k("d")));
        assert_eq!(view.move_focus(Direction::Up, false), Some(k("a")));
        view.shutdown();
    }

    #[test]
    fn test_extend_with_keyboard() {
        let config = GridkitConfig::default().with_selection_mode(SelectionMode::Multiple);
        let mut view = view_with(config);
        view.set_container_width(300.0);

        view.select(k("b"), SelectionModifiers::NONE);
        view.move_focus(Direction::Down, true);
        view.move_focus(Direction::Down, true);
        assert_eq!(view.selected_keys(), vec![k("b"), k("c"), k("d")]);
        assert_eq!(view.focused_key(), Some(&k("d")));

        view.move_focus(Direction::Up, true);
        assert_eq!(view.selected_keys(), vec![k("b"), k("c")]);
        view.shutdown();
    }

    #[test]
    fn test_type_ahead() {
        let mut view = view_with(GridkitConfig::default());
        assert_eq!(view.focus_by_text("d"), Some(k("d")));
        assert_eq!(view.focus_by_text("zz"), None);
        assert_eq!(view.focused_key(), Some(&k("d")));
        view.shutdown();
    }

    #[test]
    fn test_inline_grid_navigates_spatially() {
        let config = GridkitConfig::default()
            .with_layout_kind(LayoutKind::InlineGrid)
            .with_gap(0.0);
        let mut view = view_with(config);
        view.set_container_width(250.0);
        let sizes: HashMap<Key, Measurement> = [("a", 100.0), ("b", 100.0), ("c", 200.0), ("d", 50.0)]
            .into_iter()
            .map(|(key, w)| (k(key), Measurement::Size(Size::new(w, 20.0))))
            .collect();
        view.apply_measurements(&sizes).unwrap();
        // Rows: [a, b], [c, d].
        assert_eq!(view.rows().len(), 2);

        view.set_focused_key(Some(k("b")));
        assert_eq!(view.move_focus(Direction::Down, false), Some(k("c")));
        assert_eq!(view.move_focus(Direction::Right, false), Some(k("d")));
        view.shutdown();
    }

    #[test]
    fn test_fixed_inline_grid_short_last_row() {
        let config = GridkitConfig::default()
            .with_layout_kind(LayoutKind::InlineGrid)
            .with_item_size(Some(Size::new(100.0, 100.0)))
            .with_gap(0.0);
        let mut view = CollectionView::new(config).unwrap();
        view.set_records(
            (0..8usize).map(|i| json!({ "id": i })),
            |r: &Value| Key::from(r["id"].as_u64().unwrap_or_default() as usize),
            |r: &Value| Some(r["id"].to_string()),
        );
        view.set_container_width(300.0);
        // Rows: [0, 1, 2], [3, 4, 5], [6, 7].
        assert_eq!(view.rows().len(), 3);

        view.set_focused_key(Some(Key::from(5usize)));
        assert_eq!(view.move_focus(Direction::Down, false), Some(Key::from(7usize)));
        assert_eq!(view.move_focus(Direction::Down, false), None);
        view.set_focused_key(Some(Key::from(3usize)));
        assert_eq!(view.move_focus(Direction::Down, false), Some(Key::from(6usize)));
        view.shutdown();
    }

    #[test]
    fn test_search_filters_and_clears() {
        let config = GridkitConfig::default().with_debounce(Duration::ZERO);
        let mut view = view_with(config);
        let queries = Arc::new(Mutex::new(Vec::new()));
        let results = Arc::new(AtomicUsize::new(0));
        let (q, r) = (queries.clone(), results.clone());
        view.filter_changed.connect(move |query: &String| q.lock().push(query.clone()));
        view.filter_results_changed.connect(move |_| {
            r.fetch_add(1, Ordering::SeqCst);
        });

        let now = Instant::now();
        view.set_query("ali", now);
        assert!(view.tick(now));
        assert!(view.poll_search_timeout(Duration::from_secs(5)));
        assert_eq!(keys(&view), ["c"]);
        assert_eq!(view.filter_state().match_count, Some(1));

        view.set_query("", now);
        assert_eq!(keys(&view), ["a", "b", "c", "d"]);
        assert!(!view.filter_state().is_active());

        assert_eq!(*queries.lock(), vec!["ali".to_string(), String::new()]);
        assert_eq!(results.load(Ordering::SeqCst), 2);
        view.shutdown();
    }

    #[test]
    fn test_filter_prunes_selection() {
        let config = GridkitConfig::default()
            .with_debounce(Duration::ZERO)
            .with_selection_mode(SelectionMode::Multiple);
        let mut view = view_with(config);
        view.set_selected_keys([k("a"), k("c")]);

        let now = Instant::now();
        view.set_query("ali", now);
        view.tick(now);
        view.poll_search_timeout(Duration::from_secs(5));
        assert_eq!(view.selected_keys(), vec![k("c")]);
        view.shutdown();
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GridkitConfig::default().with_min_item_width(0.0);
        assert!(CollectionView::<Value>::new(config).is_err());
    }
}

//! Selection and focus management over a live collection.
//!
//! [`SelectionManager`] applies the high-level click and keyboard
//! operations (toggle, replace, extend, range, select-all, clear) to an
//! immutable [`Selection`], honouring the selection mode, the disabled-key
//! set and the empty-selection policy.
//!
//! # Signals
//!
//! - `selection_changed`: Emitted after a commit that changed the selected set
//! - `focus_changed`: Emitted when the focused key changes
//!
//! Operations that leave the selected set unchanged never emit.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_gridkit::model::{
//!     Collection, Key, RecordEntry, SelectionManager, SelectionMode,
//! };
//!
//! let collection = Arc::new(Collection::from_entries(
//!     ["a", "b", "c", "d"].iter().enumerate()
//!         .map(|(i, k)| RecordEntry::new(*k, k.to_string(), None, i)),
//! ));
//! let mut manager = SelectionManager::new(collection);
//! manager.set_selection_mode(SelectionMode::Multiple);
//!
//! manager.replace_selection(Key::from("b"));
//! manager.extend_selection(Key::from("d"));
//! assert_eq!(manager.selected_keys(), vec![Key::from("b"), Key::from("c"), Key::from("d")]);
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use horizon_gridkit_core::Signal;
use horizon_gridkit_core::logging::targets;
use serde::{Deserialize, Serialize};

use super::collection::Collection;
use super::key::Key;
use super::selection::Selection;

/// How many items may be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Nothing can be selected.
    None,
    /// At most one item is selected (default).
    #[default]
    Single,
    /// Any number of items, with range extension.
    Multiple,
}

/// What a plain click does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionBehavior {
    /// Clicking toggles membership.
    #[default]
    Toggle,
    /// Clicking replaces the selection.
    Replace,
}

/// What disabled keys are excluded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisabledBehavior {
    /// Disabled keys cannot be selected but can still receive focus.
    Selection,
    /// Disabled keys can neither be selected nor navigated to.
    #[default]
    All,
}

/// Which child receives focus when focus moves into nested content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChildFocusStrategy {
    #[default]
    First,
    Last,
}

/// Modifier keys held during a click or key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionModifiers {
    /// Extend the range from the anchor.
    pub shift: bool,
    /// Toggle instead of replace (Ctrl/Cmd).
    pub toggle: bool,
}

impl SelectionModifiers {
    pub const NONE: Self = Self {
        shift: false,
        toggle: false,
    };
    pub const SHIFT: Self = Self {
        shift: true,
        toggle: false,
    };
    pub const TOGGLE: Self = Self {
        shift: false,
        toggle: true,
    };
}

/// The committed selection.
#[derive(Debug, Clone)]
pub enum SelectedKeys {
    /// Every currently selectable key, resolved lazily.
    All,
    /// An explicit selection.
    Keys(Selection),
}

impl Default for SelectedKeys {
    fn default() -> Self {
        SelectedKeys::Keys(Selection::new())
    }
}

impl PartialEq for SelectedKeys {
    /// Compares the selected sets; range endpoints are ignored.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (SelectedKeys::All, SelectedKeys::All) => true,
            (SelectedKeys::Keys(a), SelectedKeys::Keys(b)) => a.set_eq(b),
            _ => false,
        }
    }
}

impl SelectedKeys {
    /// Whether this is the compact "all" marker.
    pub fn is_all(&self) -> bool {
        matches!(self, SelectedKeys::All)
    }
}

/// Policy flags and committed state of one selection manager.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    pub selection_mode: SelectionMode,
    pub selected: SelectedKeys,
    pub focused_key: Option<Key>,
    pub is_focused: bool,
    pub disabled_keys: HashSet<Key>,
    pub disabled_behavior: DisabledBehavior,
    pub selection_behavior: SelectionBehavior,
    pub disallow_empty_selection: bool,
    pub child_focus_strategy: ChildFocusStrategy,
}

/// Applies selection operations to a collection snapshot.
pub struct SelectionManager<T> {
    collection: Arc<Collection<T>>,
    state: SelectionState,

    /// Emitted with the new selection after every effective change.
    pub selection_changed: Signal<SelectedKeys>,
    /// Emitted with the new focused key when it changes.
    pub focus_changed: Signal<Option<Key>>,
}

impl<T> SelectionManager<T> {
    /// A manager with default policy over `collection`.
    pub fn new(collection: Arc<Collection<T>>) -> Self {
        Self::with_state(collection, SelectionState::default())
    }

    /// A manager starting from an explicit state.
    pub fn with_state(collection: Arc<Collection<T>>, state: SelectionState) -> Self {
        Self {
            collection,
            state,
            selection_changed: Signal::new(),
            focus_changed: Signal::new(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn collection(&self) -> &Arc<Collection<T>> {
        &self.collection
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn selection_mode(&self) -> SelectionMode {
        self.state.selection_mode
    }

    /// The committed selection, possibly the `All` marker.
    pub fn raw_selection(&self) -> &SelectedKeys {
        &self.state.selected
    }

    pub fn focused_key(&self) -> Option<&Key> {
        self.state.focused_key.as_ref()
    }

    pub fn is_focused(&self) -> bool {
        self.state.is_focused
    }

    pub fn child_focus_strategy(&self) -> ChildFocusStrategy {
        self.state.child_focus_strategy
    }

    pub fn is_disabled(&self, key: &Key) -> bool {
        self.state.disabled_keys.contains(key)
    }

    /// Keys keyboard navigation must skip.
    ///
    /// `None` when disabled keys stay focusable.
    pub fn navigation_disabled_keys(&self) -> Option<&HashSet<Key>> {
        match self.state.disabled_behavior {
            DisabledBehavior::All => Some(&self.state.disabled_keys),
            DisabledBehavior::Selection => None,
        }
    }

    /// The selected keys.
    ///
    /// The `All` marker is resolved against the current collection, in
    /// collection order, excluding keys that cannot be selected.
    pub fn selected_keys(&self) -> Vec<Key> {
        match &self.state.selected {
            _ if self.state.selection_mode == SelectionMode::None => Vec::new(),
            SelectedKeys::All => self
                .collection
                .item_keys()
                .filter(|k| self.can_select_item(k))
                .cloned()
                .collect(),
            SelectedKeys::Keys(selection) => selection.iter().cloned().collect(),
        }
    }

    pub fn selection_size(&self) -> usize {
        match &self.state.selected {
            _ if self.state.selection_mode == SelectionMode::None => 0,
            SelectedKeys::All => self
                .collection
                .item_keys()
                .filter(|k| self.can_select_item(k))
                .count(),
            SelectedKeys::Keys(selection) => selection.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.selection_size() == 0
    }

    pub fn is_select_all(&self) -> bool {
        self.state.selected.is_all()
    }

    /// Whether `key` is currently selected.
    pub fn is_selected(&self, key: &Key) -> bool {
        match &self.state.selected {
            _ if self.state.selection_mode == SelectionMode::None => false,
            SelectedKeys::All => self.can_select_item(key),
            SelectedKeys::Keys(selection) => selection.contains(key),
        }
    }

    /// Whether `key` may become selected.
    pub fn can_select_item(&self, key: &Key) -> bool {
        if self.state.selection_mode == SelectionMode::None || self.is_disabled(key) {
            return false;
        }
        self.collection.node(key).is_some_and(|node| node.is_item())
    }

    /// Inclusive key-order range between two keys, in either order.
    pub fn key_range(&self, from: &Key, to: &Key) -> Vec<Key> {
        self.collection.key_range(from, to)
    }

    // =========================================================================
    // Policy
    // =========================================================================

    /// Change the selection mode, trimming the selection to fit.
    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        if self.state.selection_mode == mode {
            return;
        }
        self.state.selection_mode = mode;
        match mode {
            SelectionMode::None => self.commit(SelectedKeys::default()),
            SelectionMode::Single => {
                let keep = match &self.state.selected {
                    SelectedKeys::All => None,
                    SelectedKeys::Keys(selection) if selection.len() <= 1 => return,
                    SelectedKeys::Keys(selection) => selection
                        .current_key()
                        .filter(|k| selection.contains(k))
                        .or_else(|| selection.iter().next())
                        .cloned(),
                };
                let next = match keep {
                    Some(key) => Selection::new().replace_with(key),
                    None => Selection::new(),
                };
                self.commit(SelectedKeys::Keys(next));
            }
            SelectionMode::Multiple => {}
        }
    }

    pub fn set_selection_behavior(&mut self, behavior: SelectionBehavior) {
        self.state.selection_behavior = behavior;
    }

    pub fn set_disabled_behavior(&mut self, behavior: DisabledBehavior) {
        self.state.disabled_behavior = behavior;
    }

    pub fn set_disallow_empty_selection(&mut self, disallow: bool) {
        self.state.disallow_empty_selection = disallow;
    }

    /// Replace the disabled-key set.
    ///
    /// Selected keys that become disabled stay in an explicit selection; the
    /// `All` marker stops reporting them.
    pub fn set_disabled_keys<I: IntoIterator<Item = Key>>(&mut self, keys: I) {
        self.state.disabled_keys = keys.into_iter().collect();
    }

    /// Record whether the owning view has input focus.
    pub fn set_focused(&mut self, focused: bool) {
        self.state.is_focused = focused;
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// Move focus to `key`.
    ///
    /// Ignored unless `key` is `None` or present in the collection.
    pub fn set_focused_key(&mut self, key: Option<Key>, strategy: ChildFocusStrategy) {
        if let Some(k) = &key {
            if !self.collection.contains(k) {
                tracing::trace!(target: targets::SELECTION, key = %k, "focus on unknown key ignored");
                return;
            }
        }
        self.state.child_focus_strategy = strategy;
        self.update_focus(key);
    }

    fn update_focus(&mut self, key: Option<Key>) {
        if self.state.focused_key != key {
            self.state.focused_key = key.clone();
            self.focus_changed.emit(key);
        }
    }

    // =========================================================================
    // Selection operations
    // =========================================================================

    /// Flip the selection state of `key`.
    pub fn toggle_selection(&mut self, key: Key) {
        if !self.can_select_item(&key) {
            tracing::trace!(target: targets::SELECTION, %key, "toggle ignored, key not selectable");
            return;
        }

        let selected = self.is_selected(&key);
        let next = match self.state.selection_mode {
            SelectionMode::Single if !selected => self.current_selection().replace_with(key),
            _ => {
                let next = self.materialized_selection().toggle(key);
                if selected && next.is_empty() && self.state.disallow_empty_selection {
                    tracing::trace!(target: targets::SELECTION, "toggle would empty selection, ignored");
                    return;
                }
                next
            }
        };
        self.commit(SelectedKeys::Keys(next));
    }

    /// Collapse the selection to `key`, or to nothing if `key` is not
    /// selectable.
    pub fn replace_selection(&mut self, key: Key) {
        if self.state.selection_mode == SelectionMode::None {
            return;
        }
        let next = if self.can_select_item(&key) {
            self.current_selection().replace_with(key)
        } else if self.state.disallow_empty_selection {
            tracing::trace!(target: targets::SELECTION, %key, "replace would empty selection, ignored");
            return;
        } else {
            Selection::new()
        };
        self.commit(SelectedKeys::Keys(next));
    }

    /// Extend the range from the anchor to `to`.
    ///
    /// The previous `[anchor, current]` range is removed before the new
    /// `[anchor, to]` range is added, so reversing direction shrinks the
    /// range.
    pub fn extend_selection(&mut self, to: Key) {
        match self.state.selection_mode {
            SelectionMode::None => return,
            SelectionMode::Single => return self.replace_selection(to),
            SelectionMode::Multiple => {}
        }
        if !self.collection.contains(&to) {
            return;
        }

        let next = match &self.state.selected {
            SelectedKeys::All => Selection::from_keys([to.clone()]).with_range(to.clone(), to),
            SelectedKeys::Keys(selection) => {
                let anchor = selection
                    .anchor_key()
                    .or(self.state.focused_key.as_ref())
                    .unwrap_or(&to)
                    .clone();
                let previous_current = selection.current_key().unwrap_or(&to).clone();

                let previous_range = self.key_range(&anchor, &previous_current);
                let added: Vec<Key> = self
                    .key_range(&anchor, &to)
                    .into_iter()
                    .filter(|k| self.can_select_item(k))
                    .collect();

                selection
                    .delete_all(&previous_range)
                    .add_all(added)
                    .with_range(anchor, to)
            }
        };
        self.commit(SelectedKeys::Keys(next));
    }

    /// Select every selectable key.
    pub fn select_all(&mut self) {
        if self.state.selection_mode != SelectionMode::Multiple {
            return;
        }
        self.commit(SelectedKeys::All);
    }

    /// Clear the selection and focus.
    pub fn clear_selection(&mut self) {
        if self.state.disallow_empty_selection {
            tracing::trace!(target: targets::SELECTION, "clear ignored, empty selection disallowed");
            return;
        }
        self.commit(SelectedKeys::default());
        self.update_focus(None);
    }

    /// Replace the selection with the inclusive range between two keys.
    pub fn select_range(&mut self, from: Key, to: Key) {
        if self.state.selection_mode != SelectionMode::Multiple {
            return;
        }
        let range = self.key_range(&from, &to);
        if range.is_empty() {
            return;
        }
        let keys = range.into_iter().filter(|k| self.can_select_item(k));
        let next = Selection::from_keys(keys).with_range(from, to);
        if next.is_empty() && self.state.disallow_empty_selection {
            return;
        }
        self.commit(SelectedKeys::Keys(next));
    }

    /// Replace the selection with an explicit key set.
    ///
    /// Unselectable keys are dropped; single mode keeps the last key.
    pub fn set_selected_keys<I: IntoIterator<Item = Key>>(&mut self, keys: I) {
        let mut keys: Vec<Key> = match self.state.selection_mode {
            SelectionMode::None => return,
            _ => keys.into_iter().filter(|k| self.can_select_item(k)).collect(),
        };
        if self.state.selection_mode == SelectionMode::Single && keys.len() > 1 {
            keys.drain(..keys.len() - 1);
        }
        if keys.is_empty() && self.state.disallow_empty_selection {
            return;
        }
        self.commit(SelectedKeys::Keys(Selection::from_keys(keys)));
    }

    /// Dispatch a click or key press on `key`.
    ///
    /// Shift in multiple mode extends the range. Otherwise the toggle
    /// modifier or toggle behavior toggles, and anything else replaces.
    /// Focus follows the key.
    pub fn select(&mut self, key: Key, modifiers: SelectionModifiers) {
        if self.state.selection_mode == SelectionMode::None {
            return;
        }
        if modifiers.shift && self.state.selection_mode == SelectionMode::Multiple {
            self.extend_selection(key.clone());
        } else if modifiers.toggle || self.state.selection_behavior == SelectionBehavior::Toggle {
            self.toggle_selection(key.clone());
        } else {
            self.replace_selection(key.clone());
        }
        let strategy = self.state.child_focus_strategy;
        self.set_focused_key(Some(key), strategy);
    }

    // =========================================================================
    // Collection updates
    // =========================================================================

    /// Swap in a new collection snapshot.
    ///
    /// Selected keys that vanished are removed. If the focused key vanished,
    /// focus moves to the first remaining item.
    pub fn set_collection(&mut self, collection: Arc<Collection<T>>) {
        self.collection = collection;

        if let SelectedKeys::Keys(selection) = &self.state.selected {
            let gone: Vec<Key> = selection
                .iter()
                .filter(|k| !self.collection.contains(k))
                .cloned()
                .collect();
            let anchor = selection.anchor_key().filter(|k| self.collection.contains(k)).cloned();
            let current = selection.current_key().filter(|k| self.collection.contains(k)).cloned();
            if !gone.is_empty() {
                tracing::debug!(target: targets::SELECTION, removed = gone.len(), "pruning vanished keys");
            }
            let next = selection.delete_all(&gone).with_anchor_and_current(anchor, current);
            self.commit(SelectedKeys::Keys(next));
        }

        if let Some(focused) = &self.state.focused_key {
            if !self.collection.contains(focused) {
                let replacement = self.collection.item_keys().next().cloned();
                self.update_focus(replacement);
            }
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// The explicit selection, or an empty one under the `All` marker.
    fn current_selection(&self) -> Selection {
        match &self.state.selected {
            SelectedKeys::All => Selection::new(),
            SelectedKeys::Keys(selection) => selection.clone(),
        }
    }

    /// The explicit selection with `All` expanded to concrete keys.
    fn materialized_selection(&self) -> Selection {
        match &self.state.selected {
            SelectedKeys::All => Selection::from_keys(self.selected_keys()),
            SelectedKeys::Keys(selection) => selection.clone(),
        }
    }

    /// Store `next`, notifying only if the selected set changed.
    fn commit(&mut self, next: SelectedKeys) {
        let changed = self.state.selected != next;
        self.state.selected = next;
        if changed {
            tracing::debug!(
                target: targets::SELECTION,
                size = self.selection_size(),
                "selection changed"
            );
            self.selection_changed.emit(self.state.selected.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CollectionBuilder, RecordEntry};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn k(s: &str) -> Key {
        Key::from(s)
    }

    fn collection(keys: &[&str]) -> Arc<Collection<String>> {
        Arc::new(Collection::from_entries(
            keys.iter()
                .enumerate()
                .map(|(i, key)| RecordEntry::new(*key, key.to_string(), Some(key.to_string()), i)),
        ))
    }

    fn manager(mode: SelectionMode) -> SelectionManager<String> {
        let mut m = SelectionManager::new(collection(&["a", "b", "c", "d", "e"]));
        m.set_selection_mode(mode);
        m
    }

    fn counter(m: &SelectionManager<String>) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        m.selection_changed.connect(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });
        count
    }

    #[test]
    fn test_mode_none_selects_nothing() {
        let mut m = manager(SelectionMode::None);
        m.toggle_selection(k("a"));
        m.replace_selection(k("b"));
        m.select_all();
        assert!(!m.is_selected(&k("a")));
        assert!(m.is_empty());
        assert!(!m.can_select_item(&k("a")));
    }

    #[test]
    fn test_can_select_item() {
        let c = Arc::new(
            CollectionBuilder::new()
                .header("h", "Header")
                .item("a", 1, None)
                .item("b", 2, None)
                .build(),
        );
        let mut m = SelectionManager::new(c);
        m.set_disabled_keys([k("b")]);
        assert!(m.can_select_item(&k("a")));
        assert!(!m.can_select_item(&k("b")));
        assert!(!m.can_select_item(&k("h")));
        assert!(!m.can_select_item(&k("zz")));
    }

    #[test]
    fn test_single_mode_toggle_replaces() {
        let mut m = manager(SelectionMode::Single);
        m.toggle_selection(k("a"));
        m.toggle_selection(k("b"));
        assert_eq!(m.selected_keys(), vec![k("b")]);

        m.toggle_selection(k("b"));
        assert!(m.is_empty());
    }

    #[test]
    fn test_multiple_mode_toggle_accumulates() {
        let mut m = manager(SelectionMode::Multiple);
        m.toggle_selection(k("a"));
        m.toggle_selection(k("c"));
        assert_eq!(m.selected_keys(), vec![k("a"), k("c")]);
        m.toggle_selection(k("a"));
        assert_eq!(m.selected_keys(), vec![k("c")]);
    }

    #[test]
    fn test_toggle_out_of_select_all() {
        let mut m = manager(SelectionMode::Multiple);
        m.select_all();
        m.toggle_selection(k("c"));
        assert!(!m.is_select_all());
        assert_eq!(m.selected_keys(), vec![k("a"), k("b"), k("d"), k("e")]);
    }

    #[test]
    fn test_disallow_empty_selection_noops() {
        let mut m = manager(SelectionMode::Multiple);
        m.set_disallow_empty_selection(true);
        m.replace_selection(k("b"));
        let count = counter(&m);

        m.toggle_selection(k("b"));
        m.clear_selection();

        assert_eq!(m.selected_keys(), vec![k("b")]);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_replace_with_unselectable_empties() {
        let mut m = manager(SelectionMode::Multiple);
        m.set_disabled_keys([k("d")]);
        m.replace_selection(k("a"));
        m.replace_selection(k("d"));
        assert!(m.is_empty());

        m.replace_selection(k("a"));
        m.set_disallow_empty_selection(true);
        m.replace_selection(k("d"));
        assert_eq!(m.selected_keys(), vec![k("a")]);
    }

    #[test]
    fn test_extend_grows_and_shrinks() {
        let mut m = manager(SelectionMode::Multiple);
        m.replace_selection(k("b"));
        m.extend_selection(k("d"));
        assert_eq!(m.selected_keys(), vec![k("b"), k("c"), k("d")]);

        m.extend_selection(k("c"));
        assert_eq!(m.selected_keys(), vec![k("b"), k("c")]);

        // Reversing past the anchor.
        m.extend_selection(k("a"));
        let mut keys = m.selected_keys();
        keys.sort_by_key(|k| k.to_string());
        assert_eq!(keys, vec![k("a"), k("b")]);
    }

    #[test]
    fn test_extend_uses_focus_as_anchor() {
        let mut m = manager(SelectionMode::Multiple);
        m.set_focused_key(Some(k("b")), ChildFocusStrategy::First);
        m.extend_selection(k("d"));
        assert_eq!(m.selected_keys(), vec![k("b"), k("c"), k("d")]);
    }

    #[test]
    fn test_extend_skips_disabled() {
        let mut m = manager(SelectionMode::Multiple);
        m.set_disabled_keys([k("c")]);
        m.replace_selection(k("a"));
        m.extend_selection(k("e"));
        assert_eq!(m.selected_keys(), vec![k("a"), k("b"), k("d"), k("e")]);
    }

    #[test]
    fn test_extend_in_single_mode_replaces() {
        let mut m = manager(SelectionMode::Single);
        m.replace_selection(k("a"));
        m.extend_selection(k("c"));
        assert_eq!(m.selected_keys(), vec![k("c")]);
    }

    #[test]
    fn test_select_all_is_lazy() {
        let mut m = manager(SelectionMode::Multiple);
        m.set_disabled_keys([k("b")]);
        m.select_all();
        assert!(m.is_selected(&k("a")));
        assert!(!m.is_selected(&k("b")));
        assert_eq!(m.selection_size(), 4);

        m.set_collection(collection(&["a", "b", "c", "d", "e", "f"]));
        assert!(m.is_selected(&k("f")));
        assert_eq!(m.selection_size(), 5);
    }

    #[test]
    fn test_select_all_requires_multiple() {
        let mut m = manager(SelectionMode::Single);
        m.select_all();
        assert!(!m.is_select_all());
    }

    #[test]
    fn test_clear_selection_clears_focus() {
        let mut m = manager(SelectionMode::Multiple);
        m.select(k("b"), SelectionModifiers::NONE);
        assert_eq!(m.focused_key(), Some(&k("b")));
        m.clear_selection();
        assert!(m.is_empty());
        assert_eq!(m.focused_key(), None);
    }

    #[test]
    fn test_select_range_symmetric() {
        let mut m = manager(SelectionMode::Multiple);
        m.select_range(k("b"), k("d"));
        let forward = m.selected_keys();
        m.select_range(k("d"), k("b"));
        let backward = m.selected_keys();
        assert_eq!(forward, vec![k("b"), k("c"), k("d")]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_set_focused_key_requires_known_key() {
        let mut m = manager(SelectionMode::Single);
        let focus_events = Arc::new(Mutex::new(Vec::new()));
        let events = focus_events.clone();
        m.focus_changed.connect(move |key| events.lock().push(key.clone()));

        m.set_focused_key(Some(k("c")), ChildFocusStrategy::Last);
        m.set_focused_key(Some(k("nope")), ChildFocusStrategy::First);
        m.set_focused_key(Some(k("c")), ChildFocusStrategy::Last);
        m.set_focused_key(None, ChildFocusStrategy::First);

        assert_eq!(*focus_events.lock(), vec![Some(k("c")), None]);
        assert_eq!(m.child_focus_strategy(), ChildFocusStrategy::First);
    }

    #[test]
    fn test_prune_on_collection_change() {
        let mut m = manager(SelectionMode::Multiple);
        m.set_selected_keys([k("b"), k("d")]);
        m.set_focused_key(Some(k("d")), ChildFocusStrategy::First);
        let count = counter(&m);

        m.set_collection(collection(&["a", "b", "c"]));

        assert_eq!(m.selected_keys(), vec![k("b")]);
        assert_eq!(m.focused_key(), Some(&k("a")));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_no_notification_without_change() {
        let mut m = manager(SelectionMode::Multiple);
        m.replace_selection(k("a"));
        let count = counter(&m);

        m.replace_selection(k("a"));
        m.toggle_selection(k("zz"));
        m.set_collection(collection(&["a", "b"]));
        assert_eq!(count.load(Ordering::SeqCst), 0);

        m.toggle_selection(k("b"));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_select_dispatch() {
        let mut m = manager(SelectionMode::Multiple);
        m.set_selection_behavior(SelectionBehavior::Replace);

        m.select(k("a"), SelectionModifiers::NONE);
        m.select(k("c"), SelectionModifiers::SHIFT);
        assert_eq!(m.selected_keys(), vec![k("a"), k("b"), k("c")]);

        m.select(k("e"), SelectionModifiers::TOGGLE);
        assert_eq!(m.selection_size(), 4);

        m.select(k("d"), SelectionModifiers::NONE);
        assert_eq!(m.selected_keys(), vec![k("d")]);
        assert_eq!(m.focused_key(), Some(&k("d")));
    }

    #[test]
    fn test_navigation_disabled_keys_follow_behavior() {
        let mut m = manager(SelectionMode::Single);
        m.set_disabled_keys([k("b")]);
        assert!(m.navigation_disabled_keys().is_some_and(|d| d.contains(&k("b"))));
        m.set_disabled_behavior(DisabledBehavior::Selection);
        assert!(m.navigation_disabled_keys().is_none());
        assert!(!m.can_select_item(&k("b")));
    }

    #[test]
    fn test_switch_to_single_trims() {
        let mut m = manager(SelectionMode::Multiple);
        m.replace_selection(k("a"));
        m.toggle_selection(k("c"));
        m.set_selection_mode(SelectionMode::Single);
        assert_eq!(m.selected_keys(), vec![k("c")]);
    }
}

//! Immutable selection value type.
//!
//! A [`Selection`] is a set of keys plus the anchor and current endpoints of
//! the most recent range operation. The endpoints need not be selected; they
//! only steer shift-extension.
//!
//! Every operation returns a new `Selection`. A holder of an older value
//! never observes a later change.
//!
//! # Example
//!
//! ```
//! use horizon_gridkit::model::{Key, Selection};
//!
//! let a = Key::from("a");
//! let selection = Selection::new().toggle(a.clone());
//! assert!(selection.contains(&a));
//! assert_eq!(selection.anchor_key(), Some(&a));
//!
//! let restored = selection.toggle(a.clone());
//! assert!(restored.set_eq(&Selection::new()));
//! ```

use indexmap::IndexSet;

use super::key::Key;

/// A set of selected keys with range endpoints.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    keys: IndexSet<Key>,
    anchor_key: Option<Key>,
    current_key: Option<Key>,
}

impl Selection {
    /// An empty selection with no endpoints.
    pub fn new() -> Self {
        Self::default()
    }

    /// A selection of `keys` with no endpoints.
    pub fn from_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            anchor_key: None,
            current_key: None,
        }
    }

    /// A copy of this selection with explicit endpoints.
    pub fn with_anchor_and_current(&self, anchor: Option<Key>, current: Option<Key>) -> Self {
        Self {
            keys: self.keys.clone(),
            anchor_key: anchor,
            current_key: current,
        }
    }

    /// Add `key`, leaving endpoints untouched.
    pub fn add(&self, key: Key) -> Self {
        let mut next = self.clone();
        next.keys.insert(key);
        next
    }

    /// Add every key in `keys`, leaving endpoints untouched.
    pub fn add_all<I: IntoIterator<Item = Key>>(&self, keys: I) -> Self {
        let mut next = self.clone();
        next.keys.extend(keys);
        next
    }

    /// Remove `key`, leaving endpoints untouched.
    pub fn delete(&self, key: &Key) -> Self {
        let mut next = self.clone();
        next.keys.shift_remove(key);
        next
    }

    /// Remove every key in `keys`, leaving endpoints untouched.
    pub fn delete_all<'a, I: IntoIterator<Item = &'a Key>>(&self, keys: I) -> Self {
        let mut next = self.clone();
        for key in keys {
            next.keys.shift_remove(key);
        }
        next
    }

    /// Flip membership of `key` and make it both anchor and current.
    pub fn toggle(&self, key: Key) -> Self {
        let mut next = self.clone();
        if !next.keys.shift_remove(&key) {
            next.keys.insert(key.clone());
        }
        next.anchor_key = Some(key.clone());
        next.current_key = Some(key);
        next
    }

    /// Collapse to the singleton `{key}` with `key` as both endpoints.
    pub fn replace_with(&self, key: Key) -> Self {
        let mut keys = IndexSet::with_capacity(1);
        keys.insert(key.clone());
        Self {
            keys,
            anchor_key: Some(key.clone()),
            current_key: Some(key),
        }
    }

    /// Same keys, new range endpoints.
    pub fn with_range(&self, anchor: Key, current: Key) -> Self {
        self.with_anchor_and_current(Some(anchor), Some(current))
    }

    /// Empty selection with no endpoints.
    pub fn clear_all(&self) -> Self {
        Self::new()
    }

    #[inline]
    pub fn contains(&self, key: &Key) -> bool {
        self.keys.contains(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Selected keys in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Key> + '_ {
        self.keys.iter()
    }

    pub fn anchor_key(&self) -> Option<&Key> {
        self.anchor_key.as_ref()
    }

    pub fn current_key(&self) -> Option<&Key> {
        self.current_key.as_ref()
    }

    /// Whether both selections contain the same keys, ignoring order and
    /// endpoints.
    pub fn set_eq(&self, other: &Selection) -> bool {
        self.keys.len() == other.keys.len() && self.keys.iter().all(|k| other.keys.contains(k))
    }
}

impl PartialEq for Selection {
    fn eq(&self, other: &Self) -> bool {
        self.set_eq(other) && self.anchor_key == other.anchor_key && self.current_key == other.current_key
    }
}

impl<K: Into<Key>> FromIterator<K> for Selection {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self::from_keys(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn k(s: &str) -> Key {
        Key::from(s)
    }

    #[test]
    fn test_from_keys_has_no_endpoints() {
        let s = Selection::from_keys(["a", "b"]);
        assert_eq!(s.len(), 2);
        assert_eq!(s.anchor_key(), None);
        assert_eq!(s.current_key(), None);
    }

    #[test]
    fn test_operations_do_not_alias() {
        let original = Selection::from_keys(["a"]);
        let added = original.add(k("b"));
        let removed = added.delete(&k("a"));

        assert!(original.contains(&k("a")));
        assert!(!original.contains(&k("b")));
        assert!(added.contains(&k("a")) && added.contains(&k("b")));
        assert!(!removed.contains(&k("a")));
    }

    #[test]
    fn test_toggle_sets_endpoints() {
        let s = Selection::new().with_range(k("x"), k("y")).toggle(k("a"));
        assert!(s.contains(&k("a")));
        assert_eq!(s.anchor_key(), Some(&k("a")));
        assert_eq!(s.current_key(), Some(&k("a")));

        let back = s.toggle(k("a"));
        assert!(back.is_empty());
        assert_eq!(back.anchor_key(), Some(&k("a")));
    }

    #[test]
    fn test_replace_with_and_clear() {
        let s = Selection::from_keys(["a", "b", "c"]).replace_with(k("b"));
        assert_eq!(s.iter().cloned().collect::<Vec<_>>(), vec![k("b")]);
        assert_eq!(s.anchor_key(), Some(&k("b")));

        let cleared = s.clear_all();
        assert!(cleared.is_empty());
        assert_eq!(cleared.anchor_key(), None);
        assert_eq!(cleared.current_key(), None);
    }

    #[test]
    fn test_with_range_keeps_keys() {
        let s = Selection::from_keys(["a"]).with_range(k("a"), k("z"));
        assert!(s.contains(&k("a")));
        assert!(!s.contains(&k("z")));
        assert_eq!(s.current_key(), Some(&k("z")));
    }

    #[test]
    fn test_set_eq_ignores_order() {
        let a = Selection::from_keys(["a", "b"]);
        let b = Selection::from_keys(["b", "a"]).with_range(k("a"), k("b"));
        assert!(a.set_eq(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_unknown_keys_are_legal() {
        let s = Selection::new().delete(&k("missing")).add(k("ghost"));
        assert!(s.contains(&k("ghost")));
    }
}

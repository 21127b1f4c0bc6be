//! The ordered key sequence and its node lookup.
//!
//! A [`Collection`] is an immutable snapshot. Whenever records, sort rules
//! or filter results change a new collection is built and swapped in whole;
//! holders of the old `Arc<Collection<T>>` keep a consistent view.
//!
//! # Example
//!
//! ```
//! use horizon_gridkit::model::{CollectionBuilder, Key};
//!
//! let collection = CollectionBuilder::new()
//!     .header("title", "Fruit")
//!     .item("apple", "Apple", Some("Apple".into()))
//!     .item("banana", "Banana", Some("Banana".into()))
//!     .build();
//!
//! assert_eq!(collection.len(), 3);
//! assert_eq!(collection.key_after(&Key::from("apple")), Some(Key::from("banana")));
//! ```

use std::sync::Arc;

use horizon_gridkit_core::logging::targets;
use indexmap::IndexMap;

use super::key::Key;
use super::node::{Node, NodeType, RecordEntry};

/// An ordered sequence of keys, each resolvable to a [`Node`].
///
/// Keys are unique; every key has a node.
#[derive(Debug)]
pub struct Collection<T> {
    nodes: IndexMap<Key, Node<T>>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            nodes: IndexMap::new(),
        }
    }
}

impl<T> Collection<T> {
    /// An empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a flat collection of items, in entry order.
    ///
    /// Later entries with an already-seen key are dropped.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = RecordEntry<T>>,
    {
        let mut builder = CollectionBuilder::new();
        for entry in entries {
            builder.push(entry.key, NodeType::Item, Some(entry.value), entry.text_value);
        }
        builder.build()
    }

    /// Number of nodes, including sections and headers.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Keys in collection order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &Key> + ExactSizeIterator + '_ {
        self.nodes.keys()
    }

    /// Keys of item nodes, in collection order.
    pub fn item_keys(&self) -> impl DoubleEndedIterator<Item = &Key> + '_ {
        self.nodes.values().filter(|n| n.is_item()).map(|n| &n.key)
    }

    /// Nodes in collection order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Node<T>> + ExactSizeIterator + '_ {
        self.nodes.values()
    }

    /// Look up the node for `key`.
    #[inline]
    pub fn node(&self, key: &Key) -> Option<&Node<T>> {
        self.nodes.get(key)
    }

    #[inline]
    pub fn contains(&self, key: &Key) -> bool {
        self.nodes.contains_key(key)
    }

    /// Position of `key` in collection order.
    #[inline]
    pub fn index_of(&self, key: &Key) -> Option<usize> {
        self.nodes.get_index_of(key)
    }

    /// The key at position `index`.
    #[inline]
    pub fn key_at(&self, index: usize) -> Option<&Key> {
        self.nodes.get_index(index).map(|(k, _)| k)
    }

    /// The node at position `index`.
    #[inline]
    pub fn node_at(&self, index: usize) -> Option<&Node<T>> {
        self.nodes.get_index(index).map(|(_, n)| n)
    }

    pub fn first_key(&self) -> Option<&Key> {
        self.key_at(0)
    }

    pub fn last_key(&self) -> Option<&Key> {
        self.nodes.last().map(|(k, _)| k)
    }

    /// The key following `key`, regardless of node type.
    pub fn key_after(&self, key: &Key) -> Option<Key> {
        let index = self.index_of(key)?;
        self.key_at(index + 1).cloned()
    }

    /// The key preceding `key`, regardless of node type.
    pub fn key_before(&self, key: &Key) -> Option<Key> {
        let index = self.index_of(key)?;
        index.checked_sub(1).and_then(|i| self.key_at(i)).cloned()
    }

    /// Keys between `from` and `to` inclusive, in collection order.
    ///
    /// The result does not depend on which boundary comes first. Unknown
    /// boundaries yield an empty range.
    pub fn key_range(&self, from: &Key, to: &Key) -> Vec<Key> {
        let (Some(a), Some(b)) = (self.index_of(from), self.index_of(to)) else {
            return Vec::new();
        };
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        (start..=end)
            .filter_map(|i| self.key_at(i).cloned())
            .collect()
    }
}

/// Builds a [`Collection`], optionally grouping items into sections.
///
/// Items added between [`section`](Self::section) and
/// [`end_section`](Self::end_section) become children of that section.
pub struct CollectionBuilder<T> {
    nodes: IndexMap<Key, Node<T>>,
    current_section: Option<Key>,
}

impl<T> Default for CollectionBuilder<T> {
    fn default() -> Self {
        Self {
            nodes: IndexMap::new(),
            current_section: None,
        }
    }
}

impl<T> CollectionBuilder<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a selectable item.
    pub fn item(mut self, key: impl Into<Key>, value: T, text_value: Option<String>) -> Self {
        self.push(key.into(), NodeType::Item, Some(Arc::new(value)), text_value);
        self
    }

    /// Append a non-selectable header.
    pub fn header(mut self, key: impl Into<Key>, title: impl Into<String>) -> Self {
        self.push(key.into(), NodeType::Header, None, Some(title.into()));
        self
    }

    /// Open a section; following nodes are nested under it.
    pub fn section(mut self, key: impl Into<Key>, title: impl Into<String>) -> Self {
        self.current_section = None;
        let key = key.into();
        if self.push(key.clone(), NodeType::Section, None, Some(title.into())) {
            self.current_section = Some(key);
        }
        self
    }

    /// Close the open section.
    pub fn end_section(mut self) -> Self {
        self.current_section = None;
        self
    }

    /// Append a node, returning `false` when the key was already present.
    fn push(
        &mut self,
        key: Key,
        node_type: NodeType,
        value: Option<Arc<T>>,
        text_value: Option<String>,
    ) -> bool {
        if self.nodes.contains_key(&key) {
            tracing::warn!(target: targets::MODEL, %key, "duplicate collection key dropped");
            return false;
        }
        let nested = node_type != NodeType::Section && self.current_section.is_some();
        let node = Node {
            key: key.clone(),
            node_type,
            value,
            text_value,
            index: self.nodes.len(),
            level: usize::from(nested),
            parent_key: if nested { self.current_section.clone() } else { None },
        };
        self.nodes.insert(key, node);
        true
    }

    /// Finish the collection.
    pub fn build(self) -> Collection<T> {
        Collection { nodes: self.nodes }
    }
}

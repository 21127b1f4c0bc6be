//! Collection nodes.

use std::sync::Arc;

use super::key::Key;

/// The kind of a node.
///
/// Only [`NodeType::Item`] nodes take part in selection and focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeType {
    #[default]
    Item,
    Section,
    Header,
}

/// One entry in a [`Collection`](super::Collection).
///
/// Nodes are built when records are ingested and replaced wholesale on
/// every rebuild.
#[derive(Debug)]
pub struct Node<T> {
    /// The record key.
    pub key: Key,
    /// Item, section or header.
    pub node_type: NodeType,
    /// The source record. Always present for items.
    pub value: Option<Arc<T>>,
    /// Text used for type-ahead search.
    pub text_value: Option<String>,
    /// Position in the collection's key order.
    pub index: usize,
    /// Nesting depth; items inside a section sit at level 1.
    pub level: usize,
    /// Enclosing section, if any.
    pub parent_key: Option<Key>,
}

impl<T> Node<T> {
    /// Whether this node can be selected or focused.
    #[inline]
    pub fn is_item(&self) -> bool {
        self.node_type == NodeType::Item
    }

    /// The text value, or an empty string.
    pub fn text(&self) -> &str {
        self.text_value.as_deref().unwrap_or("")
    }
}

impl<T> Clone for Node<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            node_type: self.node_type,
            value: self.value.clone(),
            text_value: self.text_value.clone(),
            index: self.index,
            level: self.level,
            parent_key: self.parent_key.clone(),
        }
    }
}

/// A source record after key and text extraction.
///
/// `source_index` is the record's position in the ingested sequence and
/// backs the insertion-order sort rule.
#[derive(Debug)]
pub struct RecordEntry<T> {
    pub key: Key,
    pub value: Arc<T>,
    pub text_value: Option<String>,
    pub source_index: usize,
}

impl<T> RecordEntry<T> {
    /// Create an entry.
    pub fn new(key: impl Into<Key>, value: T, text_value: Option<String>, source_index: usize) -> Self {
        Self {
            key: key.into(),
            value: Arc::new(value),
            text_value,
            source_index,
        }
    }
}

impl<T> Clone for RecordEntry<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            value: Arc::clone(&self.value),
            text_value: self.text_value.clone(),
            source_index: self.source_index,
        }
    }
}

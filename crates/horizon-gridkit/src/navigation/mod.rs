//! Keyboard navigation delegates.
//!
//! A [`KeyboardDelegate`] maps a key and an arrow direction to the key that
//! should receive focus next. Three implementations share one contract:
//!
//! - [`ListKeyboardDelegate`]: linear successor/predecessor
//! - [`GridKeyboardDelegate`]: fixed column arithmetic
//! - [`SpatialKeyboardDelegate`]: nearest neighbour over item rectangles,
//!   for wrapping layouts whose rows are uneven
//!
//! All of them skip disabled keys and non-item nodes, and implement the same
//! type-ahead search.
//!
//! # Example
//!
//! ```
//! use horizon_gridkit::model::{Collection, Key, RecordEntry};
//! use horizon_gridkit::navigation::{GridKeyboardDelegate, KeyboardDelegate, NavigationContext};
//!
//! let collection = Collection::from_entries(
//!     (0..9usize).map(|i| RecordEntry::new(i, i, Some(format!("item {i}")), i)),
//! );
//! let grid = GridKeyboardDelegate::new(NavigationContext::new(&collection, None), 3);
//!
//! assert_eq!(grid.key_below(&Key::from(1usize)), Some(Key::from(4usize)));
//! assert_eq!(grid.key_right_of(&Key::from(2usize)), Some(Key::from(3usize)));
//! ```

mod grid;
mod list;
mod spatial;

use std::collections::HashMap;
use std::collections::HashSet;

pub use grid::GridKeyboardDelegate;
pub use list::ListKeyboardDelegate;
pub use spatial::{DEFAULT_HORIZONTAL_BIAS, SpatialKeyboardDelegate};

use crate::geometry::Rect;
use crate::model::{Collection, Key};

/// Maps keys to their neighbours for keyboard navigation.
pub trait KeyboardDelegate {
    /// The key below `key`, or `None` at the boundary.
    fn key_below(&self, key: &Key) -> Option<Key>;

    /// The key above `key`, or `None` at the boundary.
    fn key_above(&self, key: &Key) -> Option<Key>;

    /// The key left of `key`. Lists have no horizontal neighbours.
    fn key_left_of(&self, _key: &Key) -> Option<Key> {
        None
    }

    /// The key right of `key`. Lists have no horizontal neighbours.
    fn key_right_of(&self, _key: &Key) -> Option<Key> {
        None
    }

    /// The first navigable key.
    fn first_key(&self) -> Option<Key>;

    /// The last navigable key.
    fn last_key(&self) -> Option<Key>;

    /// The first key whose text starts with `text`, searching after `from`
    /// and wrapping around.
    fn key_for_search(&self, text: &str, from: Option<&Key>) -> Option<Key>;

    /// The key one page below `key`. `None` when paging is not configured.
    fn key_page_below(&self, _key: &Key) -> Option<Key> {
        None
    }

    /// The key one page above `key`. `None` when paging is not configured.
    fn key_page_above(&self, _key: &Key) -> Option<Key> {
        None
    }
}

/// A navigation direction, as produced by arrow and paging keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Home,
    End,
}

/// Resolve `direction` from `from` using `delegate`.
///
/// Home and End ignore `from`. Without a starting key every direction
/// lands on the first key, except Up, PageUp and End which land on the last.
pub fn navigate(delegate: &dyn KeyboardDelegate, from: Option<&Key>, direction: Direction) -> Option<Key> {
    let Some(from) = from else {
        return match direction {
            Direction::Up | Direction::PageUp | Direction::End => delegate.last_key(),
            _ => delegate.first_key(),
        };
    };
    match direction {
        Direction::Up => delegate.key_above(from),
        Direction::Down => delegate.key_below(from),
        Direction::Left => delegate.key_left_of(from),
        Direction::Right => delegate.key_right_of(from),
        Direction::PageUp => delegate.key_page_above(from),
        Direction::PageDown => delegate.key_page_below(from),
        Direction::Home => delegate.first_key(),
        Direction::End => delegate.last_key(),
    }
}

/// Supplies on-screen rectangles for keys.
pub trait RectSource {
    fn rect_of(&self, key: &Key) -> Option<Rect>;
}

impl RectSource for HashMap<Key, Rect> {
    fn rect_of(&self, key: &Key) -> Option<Rect> {
        self.get(key).copied()
    }
}

/// Rectangles and viewport height used for PageUp/PageDown.
#[derive(Clone, Copy)]
pub struct PageMetrics<'a> {
    pub rects: &'a dyn RectSource,
    pub page_height: f32,
}

/// The collection and disabled set a delegate navigates over.
pub struct NavigationContext<'a, T> {
    collection: &'a Collection<T>,
    disabled: Option<&'a HashSet<Key>>,
}

impl<T> Clone for NavigationContext<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NavigationContext<'_, T> {}

impl<'a, T> NavigationContext<'a, T> {
    /// Navigate `collection`, skipping the keys in `disabled`.
    pub fn new(collection: &'a Collection<T>, disabled: Option<&'a HashSet<Key>>) -> Self {
        Self {
            collection,
            disabled,
        }
    }

    pub fn collection(&self) -> &'a Collection<T> {
        self.collection
    }

    /// Whether the node at `index` is an enabled item.
    pub fn is_navigable(&self, index: usize) -> bool {
        self.collection.node_at(index).is_some_and(|node| {
            node.is_item() && !self.disabled.is_some_and(|d| d.contains(&node.key))
        })
    }

    /// Whether `key` is an enabled item.
    pub fn is_navigable_key(&self, key: &Key) -> bool {
        self.collection
            .index_of(key)
            .is_some_and(|index| self.is_navigable(index))
    }

    /// First navigable index at or after `start`.
    pub fn scan_forward(&self, start: usize) -> Option<usize> {
        (start..self.collection.len()).find(|&i| self.is_navigable(i))
    }

    /// First navigable index at or before `start`.
    pub fn scan_backward(&self, start: usize) -> Option<usize> {
        if self.collection.is_empty() {
            return None;
        }
        let start = start.min(self.collection.len() - 1);
        (0..=start).rev().find(|&i| self.is_navigable(i))
    }

    pub fn key_at(&self, index: usize) -> Option<Key> {
        self.collection.key_at(index).cloned()
    }

    pub fn first_key(&self) -> Option<Key> {
        self.scan_forward(0).and_then(|i| self.key_at(i))
    }

    pub fn last_key(&self) -> Option<Key> {
        self.collection
            .len()
            .checked_sub(1)
            .and_then(|last| self.scan_backward(last))
            .and_then(|i| self.key_at(i))
    }

    /// Case-insensitive prefix search.
    ///
    /// Scans from just after `from` (or the start) to the end, then wraps
    /// from the start through `from` itself.
    pub fn search(&self, text: &str, from: Option<&Key>) -> Option<Key> {
        let len = self.collection.len();
        if text.is_empty() || len == 0 {
            return None;
        }
        let needle = text.to_lowercase();
        let start = from
            .and_then(|key| self.collection.index_of(key))
            .map_or(0, |i| i + 1);

        (0..len)
            .map(|offset| (start + offset) % len)
            .find(|&i| {
                self.is_navigable(i)
                    && self
                        .collection
                        .node_at(i)
                        .is_some_and(|node| node.text().to_lowercase().starts_with(&needle))
            })
            .and_then(|i| self.key_at(i))
    }
}

/// Walk `step` from `key` while the visited rectangles stay within one page.
///
/// Returns the furthest key reached, or the single next key when the first
/// step already leaves the page.
pub(crate) fn page_walk(
    key: &Key,
    metrics: &PageMetrics<'_>,
    below: bool,
    step: impl Fn(&Key) -> Option<Key>,
) -> Option<Key> {
    let first = step(key)?;
    let Some(origin) = metrics.rects.rect_of(key) else {
        return Some(first);
    };
    let limit = if below {
        origin.top() + metrics.page_height
    } else {
        origin.top() - metrics.page_height
    };
    let within = |candidate: &Key| {
        metrics.rects.rect_of(candidate).is_some_and(|rect| {
            if below {
                rect.top() <= limit
            } else {
                rect.top() >= limit
            }
        })
    };

    let mut current = first;
    while let Some(next) = step(&current) {
        if !within(&next) {
            break;
        }
        current = next;
    }
    Some(current)
}

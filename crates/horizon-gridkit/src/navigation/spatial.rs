//! Nearest-neighbour navigation over item rectangles.
//!
//! Used for wrapping layouts where rows hold different numbers of items, so
//! column arithmetic no longer matches what is on screen.

use crate::geometry::Rect;
use crate::model::Key;

use super::{KeyboardDelegate, NavigationContext, RectSource};

/// Weight of horizontal distance relative to vertical distance when moving
/// up or down. A large value keeps vertical movement in the nearest column.
pub const DEFAULT_HORIZONTAL_BIAS: f32 = 1000.0;

/// Minimum shared height, as a fraction of the shorter item, for two items
/// to count as being on the same row.
const SAME_ROW_OVERLAP: f32 = 0.5;

/// Position-based navigation driven by a [`RectSource`].
pub struct SpatialKeyboardDelegate<'a, T, R: RectSource + ?Sized> {
    ctx: NavigationContext<'a, T>,
    rects: &'a R,
    horizontal_bias: f32,
}

impl<'a, T, R: RectSource + ?Sized> SpatialKeyboardDelegate<'a, T, R> {
    pub fn new(ctx: NavigationContext<'a, T>, rects: &'a R) -> Self {
        Self {
            ctx,
            rects,
            horizontal_bias: DEFAULT_HORIZONTAL_BIAS,
        }
    }

    /// Replace the horizontal weighting used for up/down movement.
    pub fn with_horizontal_bias(mut self, bias: f32) -> Self {
        self.horizontal_bias = bias.max(0.0);
        self
    }

    /// Enabled items with a known rectangle, other than `exclude`.
    fn candidates<'s>(&'s self, exclude: &'s Key) -> impl Iterator<Item = (&'a Key, Rect)> + 's {
        let collection = self.ctx.collection();
        (0..collection.len())
            .filter(move |&i| self.ctx.is_navigable(i))
            .filter_map(move |i| collection.key_at(i))
            .filter(move |key| *key != exclude)
            .filter_map(move |key| self.rects.rect_of(key).map(|rect| (key, rect)))
    }

    fn vertical_neighbour(&self, key: &Key, below: bool) -> Option<Key> {
        let origin = self.rects.rect_of(key)?.center();
        let mut best: Option<(&Key, f32)> = None;
        for (candidate, rect) in self.candidates(key) {
            let center = rect.center();
            let dy = center.y - origin.y;
            if (below && dy <= 0.0) || (!below && dy >= 0.0) {
                continue;
            }
            let distance = self.horizontal_bias * (center.x - origin.x).abs() + dy.abs();
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((candidate, distance));
            }
        }
        best.map(|(k, _)| k.clone())
    }

    fn horizontal_neighbour(&self, key: &Key, right: bool) -> Option<Key> {
        let source = self.rects.rect_of(key)?;
        let origin = source.center();
        let mut best: Option<(&Key, f32)> = None;
        for (candidate, rect) in self.candidates(key) {
            let shorter = source.height().min(rect.height());
            if source.vertical_overlap(&rect) <= shorter * SAME_ROW_OVERLAP {
                continue;
            }
            let dx = rect.center().x - origin.x;
            if (right && dx <= 0.0) || (!right && dx >= 0.0) {
                continue;
            }
            if best.is_none_or(|(_, d)| dx.abs() < d) {
                best = Some((candidate, dx.abs()));
            }
        }
        best.map(|(k, _)| k.clone())
    }
}

impl<T, R: RectSource + ?Sized> KeyboardDelegate for SpatialKeyboardDelegate<'_, T, R> {
    fn key_below(&self, key: &Key) -> Option<Key> {
        self.vertical_neighbour(key, true)
    }

    fn key_above(&self, key: &Key) -> Option<Key> {
        self.vertical_neighbour(key, false)
    }

    fn key_left_of(&self, key: &Key) -> Option<Key> {
        self.horizontal_neighbour(key, false)
    }

    fn key_right_of(&self, key: &Key) -> Option<Key> {
        self.horizontal_neighbour(key, true)
    }

    fn first_key(&self) -> Option<Key> {
        self.ctx.first_key()
    }

    fn last_key(&self) -> Option<Key> {
        self.ctx.last_key()
    }

    fn key_for_search(&self, text: &str, from: Option<&Key>) -> Option<Key> {
        self.ctx.search(text, from)
    }
}

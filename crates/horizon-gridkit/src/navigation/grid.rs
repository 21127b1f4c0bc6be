//! Column-arithmetic navigation for uniform grids.

use horizon_gridkit_core::logging::targets;

use crate::model::Key;

use super::{KeyboardDelegate, NavigationContext, PageMetrics, page_walk};

/// Navigation over a grid with a fixed column count.
///
/// Below/above jump by one row (`index ± columns`) and then skip disabled
/// keys in the direction of travel; left/right step by one.
pub struct GridKeyboardDelegate<'a, T> {
    ctx: NavigationContext<'a, T>,
    columns: usize,
    page: Option<PageMetrics<'a>>,
}

impl<'a, T> GridKeyboardDelegate<'a, T> {
    /// Non-positive column counts are treated as one column.
    pub fn new(ctx: NavigationContext<'a, T>, columns: i64) -> Self {
        if columns < 1 {
            tracing::trace!(target: targets::NAVIGATION, columns, "column count clamped to 1");
        }
        Self {
            ctx,
            columns: usize::try_from(columns.max(1)).unwrap_or(1),
            page: None,
        }
    }

    /// Enable PageUp/PageDown using item rectangles.
    pub fn with_page(mut self, metrics: PageMetrics<'a>) -> Self {
        self.page = Some(metrics);
        self
    }

    pub fn columns(&self) -> usize {
        self.columns
    }
}

impl<T> KeyboardDelegate for GridKeyboardDelegate<'_, T> {
    fn key_below(&self, key: &Key) -> Option<Key> {
        let index = self.ctx.collection().index_of(key)?;
        let target = index + self.columns;
        if target >= self.ctx.collection().len() {
            return None;
        }
        self.ctx.scan_forward(target).and_then(|i| self.ctx.key_at(i))
    }

    fn key_above(&self, key: &Key) -> Option<Key> {
        let index = self.ctx.collection().index_of(key)?;
        let target = index.checked_sub(self.columns)?;
        self.ctx.scan_backward(target).and_then(|i| self.ctx.key_at(i))
    }

    fn key_left_of(&self, key: &Key) -> Option<Key> {
        let index = self.ctx.collection().index_of(key)?;
        let target = index.checked_sub(1)?;
        self.ctx.scan_backward(target).and_then(|i| self.ctx.key_at(i))
    }

    fn key_right_of(&self, key: &Key) -> Option<Key> {
        let index = self.ctx.collection().index_of(key)?;
        self.ctx.scan_forward(index + 1).and_then(|i| self.ctx.key_at(i))
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

    fn key_page_below(&self, key: &Key) -> Option<Key> {
        let metrics = self.page?;
        page_walk(key, &metrics, true, |k| self.key_below(k))
    }

    fn key_page_above(&self, key: &Key) -> Option<Key> {
        let metrics = self.page?;
        page_walk(key, &metrics, false, |k| self.key_above(k))
    }
}

//! Linear navigation for single-column lists.

use crate::model::Key;

use super::{KeyboardDelegate, NavigationContext, PageMetrics, page_walk};

/// Up/Down move to the previous/next enabled item.
pub struct ListKeyboardDelegate<'a, T> {
    ctx: NavigationContext<'a, T>,
    page: Option<PageMetrics<'a>>,
}

impl<'a, T> ListKeyboardDelegate<'a, T> {
    pub fn new(ctx: NavigationContext<'a, T>) -> Self {
        Self { ctx, page: None }
    }

    /// Enable PageUp/PageDown using item rectangles.
    pub fn with_page(mut self, metrics: PageMetrics<'a>) -> Self {
        self.page = Some(metrics);
        self
    }
}

impl<T> KeyboardDelegate for ListKeyboardDelegate<'_, T> {
    fn key_below(&self, key: &Key) -> Option<Key> {
        let index = self.ctx.collection().index_of(key)?;
        self.ctx
            .scan_forward(index + 1)
            .and_then(|i| self.ctx.key_at(i))
    }

    fn key_above(&self, key: &Key) -> Option<Key> {
        let index = self.ctx.collection().index_of(key)?;
        index
            .checked_sub(1)
            .and_then(|start| self.ctx.scan_backward(start))
            .and_then(|i| self.ctx.key_at(i))
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

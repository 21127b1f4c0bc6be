//! Visible row computation for virtualized rendering.

use std::ops::Range;

use horizon_gridkit_core::logging::targets;

use super::Row;
use crate::model::Key;

/// The scrolled region of the content.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub scroll_top: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(scroll_top: f32, height: f32) -> Self {
        Self { scroll_top, height }
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.scroll_top + self.height
    }
}

/// A half-open range of row indices to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibleWindow {
    pub start: usize,
    pub end: usize,
}

impl VisibleWindow {
    pub const EMPTY: Self = Self { start: 0, end: 0 };

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end.max(self.start)
    }

    /// Item keys of the windowed rows, in order.
    pub fn keys<'r>(&self, rows: &'r [Row]) -> impl Iterator<Item = &'r Key> + 'r {
        let end = self.end.min(rows.len());
        let start = self.start.min(end);
        rows[start..end].iter().flat_map(|row| row.item_keys.iter())
    }
}

/// Rows intersecting `viewport`, widened by `overscan` rows on each side.
///
/// Rows are ordered by `y_start`, so both edges are found by binary search.
/// A row with height must overlap the viewport; merely touching an edge is
/// not enough. Zero-height rows from an unmeasured first pass count when
/// they sit on or between the edges, so they still render.
pub fn visible_window(rows: &[Row], viewport: Viewport, overscan: usize) -> VisibleWindow {
    if rows.is_empty() || viewport.height <= 0.0 {
        return VisibleWindow::EMPTY;
    }

    let top = viewport.scroll_top;
    let bottom = viewport.bottom();
    let first = rows.partition_point(|r| r.y_end() < top || (r.height > 0.0 && r.y_end() <= top));
    let past_last = rows.partition_point(|r| r.y_start < bottom || (r.height <= 0.0 && r.y_start <= bottom));
    if first >= past_last {
        tracing::trace!(target: targets::LAYOUT, top, bottom, "viewport outside content");
        return VisibleWindow::EMPTY;
    }

    VisibleWindow {
        start: first.saturating_sub(overscan),
        end: (past_last + overscan).min(rows.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize, height: f32) -> Vec<Row> {
        (0..n)
            .map(|i| Row {
                row_index: i,
                y_start: i as f32 * height,
                height,
                item_keys: vec![Key::from(i)],
            })
            .collect()
    }

    #[test]
    fn test_basic_window() {
        let rows = rows(100, 50.0);
        let w = visible_window(&rows, Viewport::new(120.0, 200.0), 0);
        // Rows 2..=6 cover y 100..350.
        assert_eq!(w, VisibleWindow { start: 2, end: 7 });
        assert_eq!(w.len(), 5);
    }

    #[test]
    fn test_overscan_is_clamped() {
        let rows = rows(10, 50.0);
        let w = visible_window(&rows, Viewport::new(0.0, 100.0), 3);
        assert_eq!(w, VisibleWindow { start: 0, end: 5 });
        let w = visible_window(&rows, Viewport::new(400.0, 100.0), 3);
        assert_eq!(w, VisibleWindow { start: 5, end: 10 });
    }

    #[test]
    fn test_edge_touching_rows_excluded() {
        let rows = rows(10, 50.0);
        // Rows 1 and 4 only touch y 100 and y 200.
        let w = visible_window(&rows, Viewport::new(100.0, 100.0), 0);
        assert_eq!(w.range(), 2..4);
        let w = visible_window(&rows, Viewport::new(100.0, 100.0), 1);
        assert_eq!(w.range(), 1..5);
    }

    #[test]
    fn test_zero_height_row_on_edge() {
        let mut rows = rows(3, 50.0);
        rows.push(Row {
            row_index: 3,
            y_start: 150.0,
            height: 0.0,
            item_keys: vec![Key::from(3usize)],
        });
        let w = visible_window(&rows, Viewport::new(50.0, 100.0), 0);
        assert_eq!(w.range(), 1..4);
    }

    #[test]
    fn test_empty_cases() {
        assert!(visible_window(&[], Viewport::new(0.0, 100.0), 2).is_empty());
        let rows = rows(3, 10.0);
        assert!(visible_window(&rows, Viewport::new(0.0, 0.0), 2).is_empty());
        assert!(visible_window(&rows, Viewport::new(500.0, 100.0), 2).is_empty());
    }

    #[test]
    fn test_zero_height_rows() {
        // Unmeasured rows all sit at y = 0.
        let rows: Vec<Row> = (0..4usize)
            .map(|i| Row {
                row_index: i,
                y_start: 0.0,
                height: 0.0,
                item_keys: vec![Key::from(i)],
            })
            .collect();
        let w = visible_window(&rows, Viewport::new(0.0, 100.0), 0);
        assert_eq!(w.range(), 0..4);
    }

    #[test]
    fn test_window_keys() {
        let rows = rows(5, 10.0);
        let w = VisibleWindow { start: 1, end: 3 };
        let keys: Vec<&Key> = w.keys(&rows).collect();
        assert_eq!(keys, vec![&Key::from(1usize), &Key::from(2usize)]);
    }
}

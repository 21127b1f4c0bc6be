//! Layout and virtualization.
//!
//! A layout turns an ordered key sequence and a container width into item
//! rectangles grouped into [`Row`]s. Three strategies share the
//! [`CollectionLayout`] contract and are wrapped by the closed [`Layout`]
//! enum:
//!
//! - [`ListLayout`]: one full-width column
//! - [`GridLayout`]: auto column count, row height = tallest member
//! - [`InlineGridLayout`]: fixed-size cells, or wrapping rows of intrinsic
//!   sizes when no cell size is configured
//!
//! Layout is two-phase. [`update`](CollectionLayout::update) places items
//! using what is known so far (unmeasured items use an estimate), then
//! [`update_with_measurements`](CollectionLayout::update_with_measurements)
//! re-lays out from the first row containing a changed item. Rows before
//! it are left untouched.
//!
//! [`virtualizer::visible_window`] picks the rows to render for a scroll
//! position, and [`invalidation::MeasurementInvalidator`] decides when a
//! full re-measure is required.

mod grid;
mod inline_grid;
pub mod invalidation;
mod list;
pub mod virtualizer;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub use grid::{GridLayout, GridLayoutConfig};
pub use inline_grid::{InlineGridLayout, InlineGridLayoutConfig};
pub use invalidation::MeasurementInvalidator;
pub use list::{ListLayout, ListLayoutConfig};
pub use virtualizer::{Viewport, VisibleWindow, visible_window};

use crate::geometry::{Rect, Size};
use crate::model::Key;
use crate::navigation::RectSource;

/// A horizontal band of items placed at the same vertical offset.
///
/// Rows are disjoint and ordered by `y_start`.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub row_index: usize,
    pub y_start: f32,
    pub height: f32,
    pub item_keys: Vec<Key>,
}

impl Row {
    /// Bottom edge of the row.
    #[inline]
    pub fn y_end(&self) -> f32 {
        self.y_start + self.height
    }
}

/// What a layout needs the renderer to measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasurementMode {
    /// Item heights at a constrained width.
    Height,
    /// Intrinsic width and height.
    Intrinsic,
    /// Nothing; sizes come from configuration.
    Fixed,
}

/// Measurement request for the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementInfo {
    pub mode: MeasurementMode,
    /// Width items are laid out at, when constrained.
    pub constrained_width: Option<f32>,
}

/// A size reported by the renderer for one item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measurement {
    Height(f32),
    Size(Size),
}

impl Measurement {
    /// Measured height, clamped at zero.
    pub fn height(&self) -> f32 {
        match self {
            Measurement::Height(h) => h.max(0.0),
            Measurement::Size(size) => size.height.max(0.0),
        }
    }

    /// Measured size; a bare height has zero width.
    pub fn size(&self) -> Size {
        match self {
            Measurement::Height(h) => Size::new(0.0, h.max(0.0)),
            Measurement::Size(size) => *size,
        }
    }
}

/// Layout contract violations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// An item measured in intrinsic mode reported zero width and height.
    #[error("item {key} reported a degenerate intrinsic size (0 x 0)")]
    DegenerateMeasurement { key: Key },
}

/// Which layout strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    #[default]
    List,
    Grid,
    InlineGrid,
}

/// The shared layout contract.
pub trait CollectionLayout {
    /// Lay out `keys` for a container of `container_width`.
    fn update(&mut self, keys: &[Key], container_width: f32);

    /// The rectangle of `key`. `None` before the first update or for
    /// unknown keys.
    fn layout_info(&self, key: &Key) -> Option<Rect>;

    /// Rows in vertical order.
    fn rows(&self) -> &[Row];

    /// Total scrollable size.
    fn content_size(&self) -> Size;

    /// What the renderer should measure, at `width` or the current
    /// container width.
    fn measurement_info(&self, width: Option<f32>) -> MeasurementInfo;

    /// Apply measured sizes and re-lay out from the first affected row.
    fn update_with_measurements(
        &mut self,
        measurements: &HashMap<Key, Measurement>,
    ) -> Result<(), LayoutError>;
}

/// The closed set of layout strategies.
#[derive(Debug, Clone)]
pub enum Layout {
    List(ListLayout),
    Grid(GridLayout),
    InlineGrid(InlineGridLayout),
}

impl Layout {
    pub fn kind(&self) -> LayoutKind {
        match self {
            Layout::List(_) => LayoutKind::List,
            Layout::Grid(_) => LayoutKind::Grid,
            Layout::InlineGrid(_) => LayoutKind::InlineGrid,
        }
    }
}

impl CollectionLayout for Layout {
    fn update(&mut self, keys: &[Key], container_width: f32) {
        match self {
            Layout::List(l) => l.update(keys, container_width),
            Layout::Grid(l) => l.update(keys, container_width),
            Layout::InlineGrid(l) => l.update(keys, container_width),
        }
    }

    fn layout_info(&self, key: &Key) -> Option<Rect> {
        match self {
            Layout::List(l) => l.layout_info(key),
            Layout::Grid(l) => l.layout_info(key),
            Layout::InlineGrid(l) => l.layout_info(key),
        }
    }

    fn rows(&self) -> &[Row] {
        match self {
            Layout::List(l) => l.rows(),
            Layout::Grid(l) => l.rows(),
            Layout::InlineGrid(l) => l.rows(),
        }
    }

    fn content_size(&self) -> Size {
        match self {
            Layout::List(l) => l.content_size(),
            Layout::Grid(l) => l.content_size(),
            Layout::InlineGrid(l) => l.content_size(),
        }
    }

    fn measurement_info(&self, width: Option<f32>) -> MeasurementInfo {
        match self {
            Layout::List(l) => l.measurement_info(width),
            Layout::Grid(l) => l.measurement_info(width),
            Layout::InlineGrid(l) => l.measurement_info(width),
        }
    }

    fn update_with_measurements(
        &mut self,
        measurements: &HashMap<Key, Measurement>,
    ) -> Result<(), LayoutError> {
        match self {
            Layout::List(l) => l.update_with_measurements(measurements),
            Layout::Grid(l) => l.update_with_measurements(measurements),
            Layout::InlineGrid(l) => l.update_with_measurements(measurements),
        }
    }
}

impl RectSource for Layout {
    fn rect_of(&self, key: &Key) -> Option<Rect> {
        self.layout_info(key)
    }
}

/// Column count that fits `width` with `item_width` cells and `gap`
/// spacing, at least one.
pub(crate) fn column_count(width: f32, item_width: f32, gap: f32) -> usize {
    let stride = item_width + gap;
    if stride <= 0.0 || !width.is_finite() {
        return 1;
    }
    ((width + gap) / stride).floor().max(1.0) as usize
}

/// Placement state shared by every layout strategy.
#[derive(Debug, Clone, Default)]
pub(crate) struct LayoutState {
    pub keys: Vec<Key>,
    pub positions: HashMap<Key, usize>,
    pub rects: Vec<Rect>,
    pub rows: Vec<Row>,
    /// Row index of every item, by position.
    pub row_of: Vec<usize>,
    pub content_size: Size,
    pub container_width: f32,
    /// Set by the first `update`.
    pub ready: bool,
}

impl LayoutState {
    /// Start a fresh pass over `keys`.
    pub fn reset(&mut self, keys: &[Key], container_width: f32) {
        self.keys = keys.to_vec();
        self.positions = keys
            .iter()
            .enumerate()
            .map(|(i, k)| (k.clone(), i))
            .collect();
        self.rects = vec![Rect::ZERO; keys.len()];
        self.row_of = vec![0; keys.len()];
        self.rows.clear();
        self.content_size = Size::ZERO;
        self.container_width = container_width.max(0.0);
        self.ready = true;
    }

    pub fn rect(&self, key: &Key) -> Option<Rect> {
        if !self.ready {
            return None;
        }
        self.positions.get(key).and_then(|&i| self.rects.get(i)).copied()
    }

    /// Earliest row containing any of `keys`.
    pub fn first_row_of<'k>(&self, keys: impl IntoIterator<Item = &'k Key>) -> Option<usize> {
        keys.into_iter()
            .filter_map(|k| self.positions.get(k))
            .filter_map(|&i| self.row_of.get(i).copied())
            .min()
    }

    /// Drop rows from `row` on, returning the first item position and the
    /// y offset to resume from.
    pub fn rewind(&mut self, row: usize, origin_y: f32) -> (usize, f32) {
        match self.rows.get(row) {
            Some(r) => {
                let first = r
                    .item_keys
                    .first()
                    .and_then(|k| self.positions.get(k))
                    .copied()
                    .unwrap_or(0);
                let y = r.y_start;
                self.rows.truncate(row);
                (first, y)
            }
            None => {
                self.rows.clear();
                (0, origin_y)
            }
        }
    }

    /// Append a row covering item positions `items`.
    pub fn push_row(&mut self, y_start: f32, height: f32, items: std::ops::Range<usize>) {
        let row_index = self.rows.len();
        for i in items.clone() {
            self.row_of[i] = row_index;
        }
        self.rows.push(Row {
            row_index,
            y_start,
            height,
            item_keys: self.keys[items].to_vec(),
        });
    }
}

/// Record measured heights that differ from what is stored.
///
/// Returns the keys whose height changed. Unknown keys are ignored once the
/// layout is ready; before that everything is kept for the first pass.
pub(crate) fn merge_heights(
    heights: &mut HashMap<Key, f32>,
    state: &LayoutState,
    measurements: &HashMap<Key, Measurement>,
) -> Vec<Key> {
    let mut changed = Vec::new();
    for (key, measurement) in measurements {
        if state.ready && !state.positions.contains_key(key) {
            continue;
        }
        let height = measurement.height();
        if heights.get(key) != Some(&height) {
            heights.insert(key.clone(), height);
            changed.push(key.clone());
        }
    }
    changed
}

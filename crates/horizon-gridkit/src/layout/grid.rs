//! Auto-column grid layout.

use std::collections::HashMap;

use horizon_gridkit_core::PerfSpan;
use horizon_gridkit_core::logging::{span_names, targets};

use super::{
    CollectionLayout, LayoutError, LayoutState, Measurement, MeasurementInfo, MeasurementMode,
    Row, column_count, merge_heights,
};
use crate::geometry::{Rect, Size};
use crate::model::Key;

/// Sizing for [`GridLayout`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayoutConfig {
    /// Narrowest an item may become before a column is dropped.
    pub min_item_width: f32,
    /// Space between columns and between rows.
    pub gap: f32,
    /// Height assumed for items not yet measured.
    pub estimated_item_height: f32,
}

impl Default for GridLayoutConfig {
    fn default() -> Self {
        Self {
            min_item_width: 200.0,
            gap: 0.0,
            estimated_item_height: 0.0,
        }
    }
}

/// A grid whose column count follows the container width.
///
/// `columns = max(1, floor((width + gap) / (min_item_width + gap)))` and
/// the columns share the remaining width equally. Each row is as tall as its
/// tallest measured member.
#[derive(Debug, Clone, Default)]
pub struct GridLayout {
    config: GridLayoutConfig,
    heights: HashMap<Key, f32>,
    columns: usize,
    item_width: f32,
    state: LayoutState,
}

impl GridLayout {
    pub fn new(config: GridLayoutConfig) -> Self {
        Self {
            config,
            heights: HashMap::new(),
            columns: 1,
            item_width: 0.0,
            state: LayoutState::default(),
        }
    }

    pub fn config(&self) -> &GridLayoutConfig {
        &self.config
    }

    /// Column count from the last update.
    pub fn columns(&self) -> usize {
        self.columns.max(1)
    }

    /// Item width from the last update.
    pub fn item_width(&self) -> f32 {
        self.item_width
    }

    fn metrics(&self, width: f32) -> (usize, f32) {
        let gap = self.config.gap;
        let columns = column_count(width, self.config.min_item_width, gap);
        let item_width = ((width - gap * (columns as f32 - 1.0)) / columns as f32).max(0.0);
        (columns, item_width)
    }

    fn layout_from_row(&mut self, row: usize) {
        let _perf = PerfSpan::new(span_names::LAYOUT);
        let gap = self.config.gap;
        let columns = self.columns();
        let (start, mut y) = self.state.rewind(row, 0.0);
        let count = self.state.keys.len();

        let mut row_start = start;
        while row_start < count {
            let row_end = (row_start + columns).min(count);
            let mut row_height: f32 = 0.0;
            for i in row_start..row_end {
                let height = self
                    .heights
                    .get(&self.state.keys[i])
                    .copied()
                    .unwrap_or(self.config.estimated_item_height);
                let column = (i - row_start) as f32;
                self.state.rects[i] =
                    Rect::new(column * (self.item_width + gap), y, self.item_width, height);
                row_height = row_height.max(height);
            }
            self.state.push_row(y, row_height, row_start..row_end);
            y += row_height + gap;
            row_start = row_end;
        }

        let height = self.state.rows.last().map_or(0.0, Row::y_end);
        self.state.content_size = Size::new(self.state.container_width, height);
        tracing::trace!(
            target: targets::LAYOUT,
            start_row = row,
            columns,
            rows = self.state.rows.len(),
            "grid laid out"
        );
    }
}

impl CollectionLayout for GridLayout {
    fn update(&mut self, keys: &[Key], container_width: f32) {
        self.state.reset(keys, container_width);
        let (columns, item_width) = self.metrics(self.state.container_width);
        self.columns = columns;
        self.item_width = item_width;
        let positions = &self.state.positions;
        self.heights.retain(|k, _| positions.contains_key(k));
        self.layout_from_row(0);
    }

    fn layout_info(&self, key: &Key) -> Option<Rect> {
        self.state.rect(key)
    }

    fn rows(&self) -> &[Row] {
        &self.state.rows
    }

    fn content_size(&self) -> Size {
        self.state.content_size
    }

    fn measurement_info(&self, width: Option<f32>) -> MeasurementInfo {
        let (_, item_width) = self.metrics(width.unwrap_or(self.state.container_width));
        MeasurementInfo {
            mode: MeasurementMode::Height,
            constrained_width: Some(item_width),
        }
    }

    fn update_with_measurements(
        &mut self,
        measurements: &HashMap<Key, Measurement>,
    ) -> Result<(), LayoutError> {
        let changed = merge_heights(&mut self.heights, &self.state, measurements);
        if !self.state.ready {
            return Ok(());
        }
        if let Some(row) = self.state.first_row_of(&changed) {
            self.layout_from_row(row);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(n: usize) -> Vec<Key> {
        (0..n).map(Key::from).collect()
    }

    fn grid(gap: f32) -> GridLayout {
        GridLayout::new(GridLayoutConfig {
            min_item_width: 100.0,
            gap,
            estimated_item_height: 0.0,
        })
    }

    #[test]
    fn test_column_formula() {
        let mut g = grid(10.0);
        g.update(&keys(7), 340.0);
        // floor((340 + 10) / 110) = 3
        assert_eq!(g.columns(), 3);
        // (340 - 2 * 10) / 3
        assert!((g.item_width() - 106.666_67).abs() < 0.01);
        assert_eq!(g.rows().len(), 3);
        assert_eq!(g.rows()[2].item_keys, vec![Key::from(6usize)]);
    }

    #[test]
    fn test_narrow_container_has_one_column() {
        let mut g = grid(10.0);
        g.update(&keys(2), 40.0);
        assert_eq!(g.columns(), 1);
        assert_eq!(g.item_width(), 40.0);
    }

    #[test]
    fn test_first_pass_zero_height() {
        let mut g = grid(10.0);
        let keys = keys(6);
        g.update(&keys, 230.0);
        assert_eq!(g.columns(), 2);
        assert!(g.rows().iter().all(|r| r.height == 0.0));
        assert_eq!(g.layout_info(&keys[3]).map(|r| r.origin.y), Some(10.0));
    }

    #[test]
    fn test_row_height_is_max_member() {
        let mut g = grid(10.0);
        let keys = keys(6);
        g.update(&keys, 230.0);

        let measurements: HashMap<Key, Measurement> = keys
            .iter()
            .enumerate()
            .map(|(i, k)| (k.clone(), Measurement::Height(20.0 + i as f32 * 5.0)))
            .collect();
        g.update_with_measurements(&measurements).unwrap();

        let heights: Vec<f32> = g.rows().iter().map(|r| r.height).collect();
        assert_eq!(heights, vec![25.0, 35.0, 45.0]);
        let starts: Vec<f32> = g.rows().iter().map(|r| r.y_start).collect();
        assert_eq!(starts, vec![0.0, 35.0, 80.0]);
        assert_eq!(g.content_size().height, 125.0);
    }

    #[test]
    fn test_incremental_keeps_earlier_rows() {
        let mut g = grid(0.0);
        let keys = keys(9);
        g.update(&keys, 300.0);
        let all: HashMap<Key, Measurement> =
            keys.iter().map(|k| (k.clone(), Measurement::Height(30.0))).collect();
        g.update_with_measurements(&all).unwrap();
        let before = g.rows().to_vec();

        let one = HashMap::from([(keys[4].clone(), Measurement::Height(80.0))]);
        g.update_with_measurements(&one).unwrap();

        assert_eq!(g.rows()[0], before[0]);
        assert_eq!(g.rows()[1].height, 80.0);
        assert_eq!(g.rows()[2].y_start, 110.0);
    }

    #[test]
    fn test_measurement_info_uses_item_width() {
        let g = grid(0.0);
        let info = g.measurement_info(Some(300.0));
        assert_eq!(info.mode, MeasurementMode::Height);
        assert_eq!(info.constrained_width, Some(100.0));
    }
}

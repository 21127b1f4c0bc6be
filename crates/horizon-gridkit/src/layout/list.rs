//! Single-column list layout.

use std::collections::HashMap;

use horizon_gridkit_core::PerfSpan;
use horizon_gridkit_core::logging::{span_names, targets};

use super::{
    CollectionLayout, LayoutError, LayoutState, Measurement, MeasurementInfo, MeasurementMode,
    Row, merge_heights,
};
use crate::geometry::{Rect, Size};
use crate::model::Key;

/// Spacing for [`ListLayout`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListLayoutConfig {
    /// Inset on every side of the list.
    pub padding: f32,
    /// Vertical space between items.
    pub gap: f32,
    /// Height assumed for items not yet measured.
    pub estimated_item_height: f32,
}

impl Default for ListLayoutConfig {
    fn default() -> Self {
        Self {
            padding: 0.0,
            gap: 0.0,
            estimated_item_height: 0.0,
        }
    }
}

/// Items stacked vertically, each spanning the padded container width.
///
/// Every item is its own row.
#[derive(Debug, Clone, Default)]
pub struct ListLayout {
    config: ListLayoutConfig,
    heights: HashMap<Key, f32>,
    state: LayoutState,
}

impl ListLayout {
    pub fn new(config: ListLayoutConfig) -> Self {
        Self {
            config,
            heights: HashMap::new(),
            state: LayoutState::default(),
        }
    }

    pub fn config(&self) -> &ListLayoutConfig {
        &self.config
    }

    fn item_width(&self, container_width: f32) -> f32 {
        (container_width - 2.0 * self.config.padding).max(0.0)
    }

    fn layout_from_row(&mut self, row: usize) {
        let _perf = PerfSpan::new(span_names::LAYOUT);
        let padding = self.config.padding;
        let width = self.item_width(self.state.container_width);
        let (start, mut y) = self.state.rewind(row, padding);

        for i in start..self.state.keys.len() {
            let height = self
                .heights
                .get(&self.state.keys[i])
                .copied()
                .unwrap_or(self.config.estimated_item_height);
            self.state.rects[i] = Rect::new(padding, y, width, height);
            self.state.push_row(y, height, i..i + 1);
            y += height + self.config.gap;
        }

        let height = match self.state.rows.last() {
            Some(last) => last.y_end() + padding,
            None => 0.0,
        };
        self.state.content_size = Size::new(self.state.container_width, height);
        tracing::trace!(target: targets::LAYOUT, start_row = row, rows = self.state.rows.len(), "list laid out");
    }
}

impl CollectionLayout for ListLayout {
    fn update(&mut self, keys: &[Key], container_width: f32) {
        self.state.reset(keys, container_width);
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
        MeasurementInfo {
            mode: MeasurementMode::Height,
            constrained_width: Some(self.item_width(width.unwrap_or(self.state.container_width))),
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

    fn layout() -> ListLayout {
        ListLayout::new(ListLayoutConfig {
            padding: 10.0,
            gap: 5.0,
            estimated_item_height: 20.0,
        })
    }

    #[test]
    fn test_no_info_before_update() {
        let l = layout();
        assert_eq!(l.layout_info(&Key::from(0usize)), None);
        assert!(l.rows().is_empty());
    }

    #[test]
    fn test_stacks_with_gap_and_padding() {
        let mut l = layout();
        let keys = keys(3);
        l.update(&keys, 200.0);

        assert_eq!(l.layout_info(&keys[0]), Some(Rect::new(10.0, 10.0, 180.0, 20.0)));
        assert_eq!(l.layout_info(&keys[1]), Some(Rect::new(10.0, 35.0, 180.0, 20.0)));
        assert_eq!(l.layout_info(&keys[2]), Some(Rect::new(10.0, 60.0, 180.0, 20.0)));
        assert_eq!(l.rows().len(), 3);
        assert_eq!(l.content_size(), Size::new(200.0, 90.0));
    }

    #[test]
    fn test_measurement_shifts_following_rows_only() {
        let mut l = layout();
        let keys = keys(5);
        l.update(&keys, 100.0);
        let before = l.rows().to_vec();

        let measurements = HashMap::from([(keys[2].clone(), Measurement::Height(50.0))]);
        l.update_with_measurements(&measurements).unwrap();

        assert_eq!(&l.rows()[..2], &before[..2]);
        assert_eq!(l.rows()[2].height, 50.0);
        assert_eq!(l.rows()[3].y_start, before[3].y_start + 30.0);
        assert_eq!(l.content_size().height, before.last().unwrap().y_end() + 30.0 + 10.0);
    }

    #[test]
    fn test_unchanged_measurement_is_noop() {
        let mut l = layout();
        let keys = keys(2);
        l.update(&keys, 100.0);
        let measurements = HashMap::from([(keys[0].clone(), Measurement::Height(20.0))]);
        l.update_with_measurements(&measurements).unwrap();
        let rows = l.rows().to_vec();
        l.update_with_measurements(&measurements).unwrap();
        assert_eq!(l.rows(), rows.as_slice());
    }

    #[test]
    fn test_measurements_before_update_are_kept() {
        let mut l = layout();
        let keys = keys(2);
        let measurements = HashMap::from([(keys[1].clone(), Measurement::Height(40.0))]);
        l.update_with_measurements(&measurements).unwrap();
        l.update(&keys, 100.0);
        assert_eq!(l.layout_info(&keys[1]).map(|r| r.height()), Some(40.0));
    }

    #[test]
    fn test_empty_list() {
        let mut l = layout();
        l.update(&[], 100.0);
        assert!(l.rows().is_empty());
        assert_eq!(l.content_size(), Size::new(100.0, 0.0));
    }

    #[test]
    fn test_default_estimate_is_zero() {
        let mut l = ListLayout::default();
        let keys = keys(2);
        l.update(&keys, 50.0);
        assert_eq!(l.layout_info(&keys[1]), Some(Rect::new(0.0, 0.0, 50.0, 0.0)));
        assert_eq!(
            l.measurement_info(None),
            MeasurementInfo {
                mode: MeasurementMode::Height,
                constrained_width: Some(50.0),
            }
        );
    }
}

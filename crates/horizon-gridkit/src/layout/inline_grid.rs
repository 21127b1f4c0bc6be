//! Wrapping inline grid layout.
//!
//! With a configured cell size items sit in a regular grid whose column
//! count follows the container width. Without one, each item is measured at
//! its intrinsic size and items flow left to right, wrapping when the next
//! item would overflow the row. Such rows are uneven, which is why keyboard
//! navigation over this layout is spatial.

use std::collections::HashMap;

use horizon_gridkit_core::PerfSpan;
use horizon_gridkit_core::logging::{span_names, targets};

use super::{
    CollectionLayout, LayoutError, LayoutState, Measurement, MeasurementInfo, MeasurementMode,
    Row, column_count,
};
use crate::geometry::{Rect, Size};
use crate::model::Key;

/// Sizing for [`InlineGridLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InlineGridLayoutConfig {
    /// Fixed cell size; `None` measures items intrinsically.
    pub item_size: Option<Size>,
    /// Space between items and between rows.
    pub gap: f32,
}

/// Fixed-cell or flow-wrapped grid.
#[derive(Debug, Clone, Default)]
pub struct InlineGridLayout {
    config: InlineGridLayoutConfig,
    sizes: HashMap<Key, Size>,
    state: LayoutState,
}

impl InlineGridLayout {
    pub fn new(config: InlineGridLayoutConfig) -> Self {
        Self {
            config,
            sizes: HashMap::new(),
            state: LayoutState::default(),
        }
    }

    pub fn config(&self) -> &InlineGridLayoutConfig {
        &self.config
    }

    fn layout_from_row(&mut self, row: usize) {
        let _perf = PerfSpan::new(span_names::LAYOUT);
        match self.config.item_size {
            Some(size) => self.layout_fixed(size),
            None => self.layout_flow(row),
        }
        let height = self.state.rows.last().map_or(0.0, Row::y_end);
        self.state.content_size = Size::new(self.state.container_width, height);
        tracing::trace!(
            target: targets::LAYOUT,
            start_row = row,
            rows = self.state.rows.len(),
            "inline grid laid out"
        );
    }

    fn layout_fixed(&mut self, size: Size) {
        let gap = self.config.gap;
        let columns = column_count(self.state.container_width, size.width, gap);
        self.state.rows.clear();

        let count = self.state.keys.len();
        let mut y = 0.0;
        let mut row_start = 0;
        while row_start < count {
            let row_end = (row_start + columns).min(count);
            for i in row_start..row_end {
                let x = (i - row_start) as f32 * (size.width + gap);
                self.state.rects[i] = Rect::new(x, y, size.width, size.height);
            }
            self.state.push_row(y, size.height, row_start..row_end);
            y += size.height + gap;
            row_start = row_end;
        }
    }

    fn layout_flow(&mut self, row: usize) {
        let gap = self.config.gap;
        let width = self.state.container_width;
        let (start, mut y) = self.state.rewind(row, 0.0);
        let count = self.state.keys.len();

        let mut row_start = start;
        let mut x = 0.0;
        let mut row_height: f32 = 0.0;
        for i in start..count {
            let size = self
                .sizes
                .get(&self.state.keys[i])
                .copied()
                .unwrap_or(Size::ZERO);
            if i > row_start && x + gap + size.width > width {
                self.state.push_row(y, row_height, row_start..i);
                y += row_height + gap;
                row_start = i;
                x = 0.0;
                row_height = 0.0;
            }
            if i > row_start {
                x += gap;
            }
            self.state.rects[i] = Rect::new(x, y, size.width, size.height);
            x += size.width;
            row_height = row_height.max(size.height);
        }
        if row_start < count {
            self.state.push_row(y, row_height, row_start..count);
        }
    }
}

impl CollectionLayout for InlineGridLayout {
    fn update(&mut self, keys: &[Key], container_width: f32) {
        self.state.reset(keys, container_width);
        let positions = &self.state.positions;
        self.sizes.retain(|k, _| positions.contains_key(k));
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
        match self.config.item_size {
            Some(_) => MeasurementInfo {
                mode: MeasurementMode::Fixed,
                constrained_width: None,
            },
            None => MeasurementInfo {
                mode: MeasurementMode::Intrinsic,
                constrained_width: Some(width.unwrap_or(self.state.container_width)),
            },
        }
    }

    fn update_with_measurements(
        &mut self,
        measurements: &HashMap<Key, Measurement>,
    ) -> Result<(), LayoutError> {
        if self.config.item_size.is_some() {
            return Ok(());
        }

        // Validate everything before applying anything.
        for (key, measurement) in measurements {
            if measurement.size().is_degenerate() {
                tracing::error!(
                    target: targets::LAYOUT,
                    %key,
                    "intrinsic measurement reported 0 x 0; the renderer must measure before reporting"
                );
                return Err(LayoutError::DegenerateMeasurement { key: key.clone() });
            }
        }

        let mut changed = Vec::new();
        for (key, measurement) in measurements {
            if self.state.ready && !self.state.positions.contains_key(key) {
                continue;
            }
            let size = measurement.size();
            if self.sizes.get(key) != Some(&size) {
                self.sizes.insert(key.clone(), size);
                changed.push(key.clone());
            }
        }

        if !self.state.ready {
            return Ok(());
        }
        if let Some(row) = self.state.first_row_of(&changed) {
            self.layout_from_row(row);
        }
        Ok(())
    }
}

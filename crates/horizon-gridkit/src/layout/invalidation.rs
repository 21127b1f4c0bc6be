//! Full re-measurement triggers.
//!
//! Two external changes invalidate every measured size at once: the
//! container width moving by more than scrollbar-sized jitter, and the base
//! text scale changing, which shows up as a different size of a sentinel
//! probe element. Both force a complete re-measure, never a partial patch.

use horizon_gridkit_core::logging::targets;

use crate::geometry::Size;

/// Width changes at or below this many pixels are treated as jitter.
pub const DEFAULT_WIDTH_NOISE_THRESHOLD: f32 = 2.0;

/// Tracks container width and scale probe, and latches a dirty flag when
/// either moves.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementInvalidator {
    width_noise_threshold: f32,
    committed_width: Option<f32>,
    probe: Option<Size>,
    dirty: bool,
}

impl Default for MeasurementInvalidator {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH_NOISE_THRESHOLD)
    }
}

impl MeasurementInvalidator {
    pub fn new(width_noise_threshold: f32) -> Self {
        Self {
            width_noise_threshold: width_noise_threshold.max(0.0),
            committed_width: None,
            probe: None,
            dirty: false,
        }
    }

    pub fn width_noise_threshold(&self) -> f32 {
        self.width_noise_threshold
    }

    /// The width of the last accepted change.
    pub fn committed_width(&self) -> Option<f32> {
        self.committed_width
    }

    /// Report the current container width.
    ///
    /// Returns `true` when the layout must be recomputed. The comparison is
    /// against the last committed width, so slow drift made of many small
    /// steps still triggers once it exceeds the threshold.
    pub fn observe_width(&mut self, width: f32) -> bool {
        let changed = match self.committed_width {
            None => true,
            Some(committed) => (width - committed).abs() > self.width_noise_threshold,
        };
        if changed {
            tracing::debug!(
                target: targets::LAYOUT,
                from = ?self.committed_width,
                to = width,
                "container width changed"
            );
            self.committed_width = Some(width);
            self.dirty = true;
        }
        changed
    }

    /// Report the measured size of the scale probe.
    ///
    /// The first observation only records a baseline.
    pub fn observe_probe(&mut self, size: Size) -> bool {
        let changed = self.probe.is_some_and(|previous| previous != size);
        if changed {
            tracing::debug!(target: targets::LAYOUT, ?size, "scale probe changed");
            self.dirty = true;
        }
        self.probe = Some(size);
        changed
    }

    /// Force a full re-measure.
    pub fn invalidate_all(&mut self) {
        self.dirty = true;
    }

    /// Whether every item must be measured again.
    pub fn needs_full_remeasure(&self) -> bool {
        self.dirty
    }

    /// Acknowledge a completed full re-measure.
    pub fn clear(&mut self) {
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_width_invalidates() {
        let mut inv = MeasurementInvalidator::default();
        assert!(!inv.needs_full_remeasure());
        assert!(inv.observe_width(800.0));
        assert!(inv.needs_full_remeasure());
        assert_eq!(inv.committed_width(), Some(800.0));
    }

    #[test]
    fn test_jitter_ignored() {
        let mut inv = MeasurementInvalidator::default();
        inv.observe_width(800.0);
        inv.clear();

        assert!(!inv.observe_width(801.5));
        assert!(!inv.observe_width(798.0));
        assert!(!inv.needs_full_remeasure());
        assert_eq!(inv.committed_width(), Some(800.0));
    }

    #[test]
    fn test_drift_accumulates() {
        let mut inv = MeasurementInvalidator::default();
        inv.observe_width(800.0);
        inv.clear();
        assert!(!inv.observe_width(801.5));
        assert!(inv.observe_width(803.0));
        assert_eq!(inv.committed_width(), Some(803.0));
    }

    #[test]
    fn test_probe_change() {
        let mut inv = MeasurementInvalidator::default();
        assert!(!inv.observe_probe(Size::new(10.0, 16.0)));
        assert!(!inv.observe_probe(Size::new(10.0, 16.0)));
        assert!(!inv.needs_full_remeasure());

        assert!(inv.observe_probe(Size::new(12.5, 20.0)));
        assert!(inv.needs_full_remeasure());
        inv.clear();
        assert!(!inv.needs_full_remeasure());
    }

    #[test]
    fn test_invalidate_all() {
        let mut inv = MeasurementInvalidator::new(0.0);
        inv.invalidate_all();
        assert!(inv.needs_full_remeasure());
        inv.clear();
        inv.observe_width(100.0);
        inv.clear();
        assert!(inv.observe_width(100.5));
    }
}

//! View configuration.
//!
//! [`GridkitConfig`] gathers layout, selection, search, sort and locale
//! settings. Every field has a default, so a configuration file only needs
//! to name what it changes:
//!
//! ```toml
//! locale = "de-DE"
//!
//! [layout]
//! kind = "grid"
//! min_item_width = 180.0
//! gap = 8.0
//!
//! [selection]
//! mode = "multiple"
//!
//! [search]
//! debounce_ms = 200
//!
//! [[sort]]
//! property = "name"
//! type = "string"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use horizon_gridkit_core::{GridkitError, WorkerConfig};
use serde::{Deserialize, Serialize};

use crate::geometry::Size;
use crate::layout::invalidation::DEFAULT_WIDTH_NOISE_THRESHOLD;
use crate::layout::{
    GridLayout, GridLayoutConfig, InlineGridLayout, InlineGridLayoutConfig, Layout, LayoutKind,
    ListLayout, ListLayoutConfig,
};
use crate::model::{DisabledBehavior, SelectionBehavior, SelectionMode, SelectionState};
use crate::search::SearchConfig;
use crate::sort::SortState;

/// Configuration loading and validation failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl From<ConfigError> for GridkitError {
    fn from(err: ConfigError) -> Self {
        GridkitError::Config(err.to_string())
    }
}

/// Layout strategy and spacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub kind: LayoutKind,
    pub gap: f32,
    /// List inset on every side.
    pub padding: f32,
    /// Grid column breakpoint.
    pub min_item_width: f32,
    /// Fixed inline grid cell; intrinsic sizing when absent.
    pub item_size: Option<Size>,
    pub estimated_item_height: f32,
    /// Extra rows rendered above and below the viewport.
    pub overscan_rows: usize,
    pub width_noise_threshold: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            kind: LayoutKind::List,
            gap: 0.0,
            padding: 0.0,
            min_item_width: 200.0,
            item_size: None,
            estimated_item_height: 0.0,
            overscan_rows: 2,
            width_noise_threshold: DEFAULT_WIDTH_NOISE_THRESHOLD,
        }
    }
}

impl LayoutSettings {
    /// A fresh layout of the configured kind.
    pub fn build_layout(&self) -> Layout {
        match self.kind {
            LayoutKind::List => Layout::List(ListLayout::new(ListLayoutConfig {
                padding: self.padding,
                gap: self.gap,
                estimated_item_height: self.estimated_item_height,
            })),
            LayoutKind::Grid => Layout::Grid(GridLayout::new(GridLayoutConfig {
                min_item_width: self.min_item_width,
                gap: self.gap,
                estimated_item_height: self.estimated_item_height,
            })),
            LayoutKind::InlineGrid => Layout::InlineGrid(InlineGridLayout::new(InlineGridLayoutConfig {
                item_size: self.item_size,
                gap: self.gap,
            })),
        }
    }
}

/// Selection policy.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionSettings {
    pub mode: SelectionMode,
    pub behavior: SelectionBehavior,
    pub disabled_behavior: DisabledBehavior,
    pub disallow_empty_selection: bool,
}

impl SelectionSettings {
    /// An empty selection state carrying this policy.
    pub fn initial_state(&self) -> SelectionState {
        SelectionState {
            selection_mode: self.mode,
            selection_behavior: self.behavior,
            disabled_behavior: self.disabled_behavior,
            disallow_empty_selection: self.disallow_empty_selection,
            ..SelectionState::default()
        }
    }
}

/// Search timing and worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub debounce_ms: u64,
    pub min_query_length: usize,
    pub worker_name: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: 150,
            min_query_length: 1,
            worker_name: "gridkit-search".to_string(),
        }
    }
}

impl SearchSettings {
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            debounce: Duration::from_millis(self.debounce_ms),
            min_query_length: self.min_query_length,
            worker: WorkerConfig::with_name(self.worker_name.clone()),
        }
    }
}

/// Complete view configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridkitConfig {
    /// BCP 47 tag used for string collation.
    pub locale: String,
    pub layout: LayoutSettings,
    pub selection: SelectionSettings,
    pub search: SearchSettings,
    /// Sort rules applied when the view is created.
    pub sort: SortState,
}

impl Default for GridkitConfig {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            layout: LayoutSettings::default(),
            selection: SelectionSettings::default(),
            search: SearchSettings::default(),
            sort: SortState::default(),
        }
    }
}

impl GridkitConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate TOML.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: GridkitConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load_toml(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(target: horizon_gridkit_core::logging::targets::VIEW, path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values no layout can work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let layout = &self.layout;
        let non_negative = [
            ("layout.gap", layout.gap),
            ("layout.padding", layout.padding),
            ("layout.estimated_item_height", layout.estimated_item_height),
            ("layout.width_noise_threshold", layout.width_noise_threshold),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("expected a non-negative number, got {value}"),
                });
            }
        }
        if !layout.min_item_width.is_finite() || layout.min_item_width <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "layout.min_item_width",
                reason: format!("expected a positive number, got {}", layout.min_item_width),
            });
        }
        if let Some(size) = layout.item_size
            && size.is_empty()
        {
            return Err(ConfigError::Invalid {
                field: "layout.item_size",
                reason: format!("cells must have positive width and height, got {size:?}"),
            });
        }
        if self.search.worker_name.is_empty() {
            return Err(ConfigError::Invalid {
                field: "search.worker_name",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    // Builder-style setters

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn with_layout_kind(mut self, kind: LayoutKind) -> Self {
        self.layout.kind = kind;
        self
    }

    pub fn with_gap(mut self, gap: f32) -> Self {
        self.layout.gap = gap;
        self
    }

    pub fn with_min_item_width(mut self, width: f32) -> Self {
        self.layout.min_item_width = width;
        self
    }

    pub fn with_item_size(mut self, size: Option<Size>) -> Self {
        self.layout.item_size = size;
        self
    }

    pub fn with_overscan_rows(mut self, rows: usize) -> Self {
        self.layout.overscan_rows = rows;
        self
    }

    pub fn with_selection_mode(mut self, mode: SelectionMode) -> Self {
        self.selection.mode = mode;
        self
    }

    pub fn with_disallow_empty_selection(mut self, disallow: bool) -> Self {
        self.selection.disallow_empty_selection = disallow;
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.search.debounce_ms = u64::try_from(debounce.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_min_query_length(mut self, length: usize) -> Self {
        self.search.min_query_length = length;
        self
    }

    pub fn with_sort(mut self, sort: SortState) -> Self {
        self.sort = sort;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::{SortDirection, SortProperty, SortRule, SortType};
    use std::io::Write;

    #[test]
    fn test_defaults_from_empty_document() {
        let config = GridkitConfig::from_toml_str("").unwrap();
        assert_eq!(config, GridkitConfig::default());
        assert_eq!(config.layout.kind, LayoutKind::List);
        assert_eq!(config.search.search_config().debounce, Duration::from_millis(150));
    }

    #[test]
    fn test_full_document() {
        let config = GridkitConfig::from_toml_str(
            r#"
            locale = "de-DE"

            [layout]
            kind = "inline_grid"
            gap = 4.0
            item_size = { width = 120.0, height = 90.0 }
            overscan_rows = 5

            [selection]
            mode = "multiple"
            behavior = "replace"
            disabled_behavior = "selection"
            disallow_empty_selection = true

            [search]
            debounce_ms = 50
            min_query_length = 2

            [[sort]]
            property = "*"
            direction = "desc"

            [[sort]]
            property = "author.name"
            type = "string"
            "#,
        )
        .unwrap();

        assert_eq!(config.locale, "de-DE");
        assert_eq!(config.layout.kind, LayoutKind::InlineGrid);
        assert_eq!(config.layout.item_size, Some(Size::new(120.0, 90.0)));
        assert_eq!(config.layout.overscan_rows, 5);
        assert_eq!(config.selection.mode, SelectionMode::Multiple);
        assert_eq!(config.selection.behavior, SelectionBehavior::Replace);
        assert_eq!(config.selection.disabled_behavior, DisabledBehavior::Selection);
        assert!(config.selection.initial_state().disallow_empty_selection);
        assert_eq!(config.search.min_query_length, 2);
        assert_eq!(config.sort.rules()[0].property, SortProperty::InsertionOrder);
        assert_eq!(config.sort.rules()[0].direction, SortDirection::Desc);
        assert_eq!(config.sort.rules()[1], SortRule::ascending("author.name", SortType::String));
        assert_eq!(config.layout.build_layout().kind(), LayoutKind::InlineGrid);
    }

    #[test]
    fn test_validation() {
        let err = GridkitConfig::from_toml_str("[layout]\ngap = -1.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "layout.gap", .. }));

        let err = GridkitConfig::from_toml_str("[layout]\nmin_item_width = 0.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "layout.min_item_width", .. }));

        let err = GridkitConfig::from_toml_str("[layout]\nitem_size = { width = 0.0, height = 10.0 }").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "layout.item_size", .. }));

        let err = GridkitConfig::from_toml_str("[layout]\nkind = \"masonry\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_round_trip_through_file() {
        let config = GridkitConfig::new()
            .with_layout_kind(LayoutKind::Grid)
            .with_gap(6.0)
            .with_selection_mode(SelectionMode::Multiple)
            .with_debounce(Duration::from_millis(75))
            .with_sort(SortState::new([SortRule::descending("size", SortType::Number)]));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(config.to_toml_string().unwrap().as_bytes()).unwrap();
        let loaded = GridkitConfig::load_toml(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = GridkitConfig::load_toml(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        let err: GridkitError = err.into();
        assert!(err.to_string().starts_with("Configuration error"));
    }
}

//! Prelude module for Horizon Gridkit.
//!
//! Re-exports the types most widget integrations need:
//!
//! ```
//! use horizon_gridkit::prelude::*;
//! ```
//!
//! This provides access to:
//! - The per-instance view (`CollectionView`) and its configuration
//! - Keys, collections and the selection model
//! - Navigation directions and delegates
//! - Layout kinds, measurements and visible windows
//! - Sort rules and filter state

// ============================================================================
// View and Configuration
// ============================================================================

pub use crate::config::{ConfigError, GridkitConfig};
pub use crate::view::CollectionView;

// ============================================================================
// Signals and Errors
// ============================================================================

pub use horizon_gridkit_core::{GridkitError, Signal};

// ============================================================================
// Model
// ============================================================================

pub use crate::model::{
    Collection, FieldPath, FieldValue, Key, Record, RecordEntry, SelectedKeys, Selection,
    SelectionBehavior, SelectionMode, SelectionModifiers,
};

// ============================================================================
// Navigation
// ============================================================================

pub use crate::navigation::{Direction, KeyboardDelegate};

// ============================================================================
// Layout
// ============================================================================

pub use crate::geometry::{Point, Rect, Size};
pub use crate::layout::{LayoutError, LayoutKind, Measurement, MeasurementMode, Row, VisibleWindow};

// ============================================================================
// Sort and Search
// ============================================================================

pub use crate::search::FilterState;
pub use crate::sort::{SortDirection, SortRule, SortState, SortType};

//! Horizon Gridkit - a headless engine for keyboard-navigable lists and grids.
//!
//! The crate holds everything a list or grid widget needs except drawing:
//!
//! - **Model**: Keys, nodes, immutable [`Collection`](model::Collection)
//!   snapshots and the selection model
//! - **Navigation**: List, grid and spatial keyboard delegates
//! - **Layout**: Row grouping, incremental re-measurement and binary-search
//!   windowing
//! - **Sort**: Multi-rule comparators with locale-aware collation, merged with
//!   search relevance
//! - **Search**: Debounced fuzzy search on a background worker
//! - **View**: [`CollectionView`](view::CollectionView), which ties them
//!   together per widget instance
//!
//! # Example
//!
//! ```
//! use horizon_gridkit::prelude::*;
//! use serde_json::{Value, json};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GridkitConfig::default()
//!         .with_layout_kind(LayoutKind::Grid)
//!         .with_min_item_width(100.0)
//!         .with_selection_mode(SelectionMode::Multiple);
//!     let mut view = CollectionView::<Value>::new(config)?;
//!
//!     let records = (0..6).map(|i| json!({ "id": i, "name": format!("file {i}") }));
//!     view.set_records(
//!         records,
//!         |r| Key::from_json(&r["id"]).unwrap_or_else(|| Key::from("?")),
//!         |r| r["name"].as_str().map(str::to_string),
//!     );
//!     view.set_container_width(300.0);
//!
//!     view.move_focus(Direction::Down, false);
//!     view.move_focus(Direction::Down, true);
//!     let expected: Vec<Key> = (0..4i64).map(Key::from).collect();
//!     assert_eq!(view.focused_key(), Some(&Key::from(3i64)));
//!     assert_eq!(view.selected_keys(), expected);
//!
//!     view.shutdown();
//!     Ok(())
//! }
//! ```

pub use horizon_gridkit_core::{
    CancellationToken, ConnectionId, GridkitError, PerfSpan, RequestSequence,
    RequestToken, Result, Signal, SignalError, Worker, WorkerBuilder, WorkerConfig, WorkerError,
};

/// Logging targets and span names.
pub mod logging {
    pub use horizon_gridkit_core::logging::*;
}

pub mod config;
pub mod geometry;
pub mod layout;
pub mod model;
pub mod navigation;
pub mod prelude;
pub mod search;
pub mod sort;
pub mod view;

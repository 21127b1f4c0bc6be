//! Logging and tracing facilities for Horizon Gridkit.
//!
//! This module provides:
//! - Integration with the `tracing` crate for structured logging
//! - Target and span names for filtering individual subsystems
//! - Performance tracing hooks for profiling
//!
//! # Tracing Integration
//!
//! Horizon Gridkit uses the `tracing` crate for instrumentation. To see logs,
//! you need to install a tracing subscriber in your application:
//!
//! ```ignore
//! use tracing_subscriber::EnvFilter;
//!
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter(EnvFilter::new("horizon_gridkit::search=debug"))
//!         .init();
//! }
//! ```

/// Span names used throughout Horizon Gridkit for tracing.
///
/// These constants can be used to filter traces for specific subsystems.
pub mod span_names {
    /// Sort/filter pipeline re-run.
    pub const PIPELINE: &str = "horizon_gridkit::pipeline";
    /// Layout pass (full or incremental).
    pub const LAYOUT: &str = "horizon_gridkit::layout";
    /// Background search task.
    pub const SEARCH: &str = "horizon_gridkit::search";
    /// Search index build.
    pub const INDEX: &str = "horizon_gridkit::index";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "horizon_gridkit_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_gridkit_core::signal";
    /// Background worker target.
    pub const WORKER: &str = "horizon_gridkit_core::worker";
    /// Collection model target.
    pub const MODEL: &str = "horizon_gridkit::model";
    /// Selection manager target.
    pub const SELECTION: &str = "horizon_gridkit::selection";
    /// Keyboard navigation target.
    pub const NAVIGATION: &str = "horizon_gridkit::navigation";
    /// Layout and virtualization target.
    pub const LAYOUT: &str = "horizon_gridkit::layout";
    /// Sort/filter pipeline target.
    pub const SORT: &str = "horizon_gridkit::sort";
    /// Background search target.
    pub const SEARCH: &str = "horizon_gridkit::search";
    /// Collection view orchestration target.
    pub const VIEW: &str = "horizon_gridkit::view";
}

/// A guard for timing operations.
///
/// When dropped, records the elapsed time in the trace. Use this to
/// instrument pipeline re-runs and layout passes.
///
/// # Example
///
/// ```
/// use horizon_gridkit_core::PerfSpan;
///
/// fn relayout() {
///     let _span = PerfSpan::new("relayout");
///     // ... work ...
/// }
/// ```
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
    name: &'static str,
    started: std::time::Instant,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "horizon_gridkit::perf", "perf", operation = name);
        Self {
            span: span.entered(),
            name,
            started: std::time::Instant::now(),
        }
    }
}

impl Drop for PerfSpan {
    fn drop(&mut self) {
        tracing::trace!(
            target: "horizon_gridkit::perf",
            operation = self.name,
            elapsed_us = self.started.elapsed().as_micros() as u64,
            "operation finished"
        );
    }
}

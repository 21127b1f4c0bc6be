//! Core systems for Horizon Gridkit.
//!
//! This crate provides the foundational components the collection engine is
//! built on:
//!
//! - **Errors**: Shared error types and the crate-wide `Result` alias
//! - **Logging**: Tracing targets, span names and performance spans
//! - **Signal/Slot System**: Type-safe change notification
//! - **Tokens**: Cooperative cancellation and last-request-wins sequencing
//! - **Worker**: A dedicated background thread with a bounded task queue
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_gridkit_core::Signal;
//!
//! let sort_changed = Signal::<Vec<String>>::new();
//!
//! let conn_id = sort_changed.connect(|rules| {
//!     println!("Now sorted by {:?}", rules);
//! });
//!
//! sort_changed.emit(vec!["name".to_string()]);
//! sort_changed.disconnect(conn_id);
//! ```
//!
//! # Worker Example
//!
//! ```
//! use horizon_gridkit_core::{RequestSequence, Worker};
//!
//! let worker = Worker::<(u64, usize)>::new().unwrap();
//! let sequence = RequestSequence::new();
//!
//! let token = sequence.issue();
//! let generation = token.generation();
//! let response = worker.send_sync(move || (generation, "fox".len()));
//!
//! if let Some((generation, hits)) = response {
//!     assert!(sequence.is_current_generation(generation));
//!     assert_eq!(hits, 3);
//! }
//! worker.stop_and_join();
//! ```

mod error;
pub mod logging;
pub mod signal;
pub mod token;
pub mod worker;

pub use error::{GridkitError, Result, SignalError, WorkerError};
pub use logging::PerfSpan;
pub use signal::{ConnectionId, Signal};
pub use token::{CancellationToken, RequestSequence, RequestToken};
pub use worker::{Worker, WorkerBuilder, WorkerConfig};

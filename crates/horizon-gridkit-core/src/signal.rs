//! Signal/slot system for Horizon Gridkit.
//!
//! This module provides a type-safe, Qt-inspired signal/slot mechanism used
//! by collection state to publish committed changes (selection, sort, filter
//! results). Signals are emitted after a state change has been committed, and
//! connected slots (callbacks) are invoked synchronously in the emitting
//! thread.
//!
//! # Key Types
//!
//! - [`Signal<Args>`] - The main signal type for emitting notifications
//! - [`ConnectionId`] - Unique identifier returned when connecting a slot
//!
//! # Re-entrancy
//!
//! Slots are snapshotted before invocation, so a slot may connect or
//! disconnect other slots on the same signal without deadlocking. Changes
//! made during an emission take effect from the next emission.
//!
//! # Example
//!
//! ```
//! use horizon_gridkit_core::Signal;
//!
//! // Create a signal that passes a string argument
//! let query_changed = Signal::<String>::new();
//!
//! // Connect a slot (closure)
//! let conn_id = query_changed.connect(|text| {
//!     println!("Query changed to: {}", text);
//! });
//!
//! // Emit the signal
//! query_changed.emit("fox".to_string());
//!
//! // Disconnect when done
//! query_changed.disconnect(conn_id);
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::error::SignalError;
use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via [`Signal::disconnect`].
    /// The ID remains valid until the connection is explicitly disconnected or
    /// the signal is dropped.
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A type-safe signal that can have multiple connected slots.
///
/// When a signal is emitted, all connected slots are invoked with the
/// provided arguments, in connection order.
///
/// # Type Parameter
///
/// - `Args`: The argument type passed to connected slots. Use `()` for signals
///   with no arguments, or a tuple like `(String, i32)` for multiple arguments.
///
/// # Thread Safety
///
/// `Signal<Args>` is `Send + Sync` and can be safely shared between threads.
/// Slots run on whichever thread calls [`emit`](Self::emit).
pub struct Signal<Args> {
    connections: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a `ConnectionId` that can be used to disconnect the slot later.
    ///
    /// # Example
    ///
    /// ```
    /// use horizon_gridkit_core::Signal;
    ///
    /// let signal = Signal::<String>::new();
    /// let id = signal.connect(|s| println!("Got: {}", s));
    /// signal.emit("Hello".to_string());
    /// ```
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Arc::new(slot))
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed, `false` otherwise.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Disconnect a slot, reporting an error for unknown IDs.
    pub fn try_disconnect(&self, id: ConnectionId) -> Result<(), SignalError> {
        if self.disconnect(id) {
            Ok(())
        } else {
            Err(SignalError::InvalidConnection)
        }
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Emit the signal, invoking all connected slots in connection order.
    pub fn emit(&self, args: Args) {
        // Snapshot so slots can reconnect without holding the lock.
        let slots: Vec<Slot<Args>> = self.connections.lock().values().cloned().collect();
        if slots.is_empty() {
            return;
        }
        tracing::trace!(target: targets::SIGNAL, connections = slots.len(), "emitting signal");

        for slot in slots {
            slot(&args);
        }
    }
}

static_assertions::assert_impl_all!(Signal<String>: Send, Sync);

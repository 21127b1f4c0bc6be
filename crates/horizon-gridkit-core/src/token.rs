//! Cancellation and request tokens for background work.
//!
//! Two primitives live here:
//!
//! - [`CancellationToken`]: a shared flag that long-running tasks poll to
//!   stop cooperatively.
//! - [`RequestSequence`] / [`RequestToken`]: a monotonically increasing
//!   generation counter implementing "last submitted request wins". Every
//!   submission issues a fresh token and cancels the previous one; a
//!   response is only applied when its token is still the latest.
//!
//! # Example
//!
//! ```
//! use horizon_gridkit_core::RequestSequence;
//!
//! let sequence = RequestSequence::new();
//! let first = sequence.issue();
//! let second = sequence.issue();
//!
//! assert!(first.is_cancelled());
//! assert!(!sequence.is_current(&first));
//! assert!(sequence.is_current(&second));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;

/// A cancellation token for cooperative task cancellation.
///
/// Cancellation tokens allow signaling that a task should stop its work.
/// Tasks must periodically check the token and exit gracefully when cancelled.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    inner: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a new cancellation token.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Check if cancellation has been requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.inner.load(Ordering::Acquire)
    }

    /// Request cancellation.
    ///
    /// Returns `true` if this call performed the cancellation.
    pub fn cancel(&self) -> bool {
        !self.inner.swap(true, Ordering::AcqRel)
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifies one submitted background request.
///
/// Tokens are cheap to clone and compare. The generation is strictly
/// increasing within one [`RequestSequence`].
#[derive(Debug, Clone)]
pub struct RequestToken {
    generation: u64,
    cancellation: CancellationToken,
}

impl RequestToken {
    /// The generation number of this request.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a later request has superseded this one (or it was cancelled).
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// The cancellation token a task can poll while running.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }
}

impl PartialEq for RequestToken {
    fn eq(&self, other: &Self) -> bool {
        self.generation == other.generation
    }
}

impl Eq for RequestToken {}

/// Issues [`RequestToken`]s with last-submitted-wins semantics.
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: AtomicU64,
    current: Mutex<Option<CancellationToken>>,
}

impl RequestSequence {
    /// Create a sequence that has issued no tokens yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new token, cancelling the previously issued one.
    pub fn issue(&self) -> RequestToken {
        let cancellation = CancellationToken::new();
        let previous = self.current.lock().replace(cancellation.clone());
        if let Some(previous) = previous {
            previous.cancel();
        }
        let generation = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        RequestToken {
            generation,
            cancellation,
        }
    }

    /// Cancel the outstanding request without issuing a new one.
    ///
    /// Any response still in flight becomes stale.
    pub fn invalidate(&self) {
        if let Some(previous) = self.current.lock().take() {
            previous.cancel();
        }
        self.latest.fetch_add(1, Ordering::AcqRel);
    }

    /// The generation of the most recently issued (or invalidated) request.
    pub fn latest_generation(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }

    /// Whether `token` is still the latest request.
    pub fn is_current(&self, token: &RequestToken) -> bool {
        token.generation == self.latest_generation() && !token.is_cancelled()
    }

    /// Whether a response tagged with `generation` may still be applied.
    pub fn is_current_generation(&self, generation: u64) -> bool {
        generation == self.latest_generation()
    }
}

//! Search control primitives.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A thread-safe stop flag for cancelling searches.
///
/// Wraps `Arc<AtomicBool>` so the engine, the deadline timer, and every
/// search worker can share one cancellation point.
#[derive(Clone, Debug, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    /// A fresh, unset flag.
    #[must_use]
    pub fn new() -> Self {
        StopFlag::default()
    }

    /// Is the flag set?
    #[inline]
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Request cancellation.
    #[inline]
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Clear the flag for a new search.
    #[inline]
    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }

    /// Borrow the underlying atomic for the search API.
    #[inline]
    #[must_use]
    pub fn as_atomic(&self) -> &AtomicBool {
        &self.0
    }
}

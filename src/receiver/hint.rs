//! Scheduling hints for the receive thread

use std::fmt;
use std::sync::Arc;

/// Platform hook that raises the priority of the calling thread
///
/// `acquire` and `release` are both called from the receive thread, once
/// each, around the lifetime of the loop.
pub trait PerformanceHint: Send + Sync {
    /// Request elevated scheduling for the current thread
    fn acquire(&self);

    /// Drop the request made by `acquire`
    fn release(&self);
}

/// Hint that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPerformanceHint;

impl PerformanceHint for NoPerformanceHint {
    fn acquire(&self) {}

    fn release(&self) {}
}

/// Holds an acquired hint and releases it on drop
pub struct PerformanceToken {
    hint: Arc<dyn PerformanceHint>,
}

impl PerformanceToken {
    /// Acquire `hint` for the current thread
    #[must_use]
    pub fn acquire(hint: Arc<dyn PerformanceHint>) -> Self {
        hint.acquire();
        tracing::trace!("Performance hint acquired");
        Self { hint }
    }
}

impl Drop for PerformanceToken {
    fn drop(&mut self) {
        self.hint.release();
        tracing::trace!("Performance hint released");
    }
}

impl fmt::Debug for PerformanceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PerformanceToken").finish_non_exhaustive()
    }
}

//! Batch cancellation token.
//! A cloneable one-way "stop" flag shared between the orchestrator, its
//! in-flight relocation tasks and whoever may want to abort (e.g. Ctrl-C).
//!
//! Notes:
//! - Relaxed atomics are sufficient for a one-way flag; nothing else is published through it.
//! - `cancel()` is safe to call from a signal handler thread.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation (idempotent).
    #[inline]
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

//! Progress/outcome reporting contract between the engine and its caller.
//!
//! Call discipline guaranteed by `Relocator::relocate`:
//! - `started()` exactly once, before any filesystem mutation;
//! - `progress()` zero or more times, only while copying;
//! - exactly one of `success()` / `failed()`, as the last call.

use crate::errors::RelocateError;

use super::relocate::Relocation;

pub trait MoveNotifier: Send + Sync {
    fn started(&self) {}

    /// Called after each copied chunk with cumulative bytes. Return `false`
    /// to cancel the copy at this chunk boundary.
    fn progress(&self, _bytes_so_far: u64, _total_bytes: u64) -> bool {
        true
    }

    fn success(&self, _relocation: &Relocation) {}

    fn failed(&self, _reason: &RelocateError) {}
}

/// Ignores every notification and never cancels.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl MoveNotifier for NoopNotifier {}

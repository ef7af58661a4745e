//! In-memory show metadata: Show -> Season -> episode title.
//!
//! Populated lazily from whatever produced the batch (a metadata lookup, a
//! batch file) and consulted only to build destination names. Each map sits
//! behind its own `RwLock`; lookups of unknown keys return `None`.

mod registry;
mod season;
mod show;

pub use registry::ShowRegistry;
pub use season::Season;
pub use show::Show;

use std::sync::{LockResult, PoisonError};

/// The maps hold plain owned values, so a panic mid-insert cannot leave them
/// half-written; recover the guard instead of propagating the poison.
pub(crate) fn recover<G>(res: LockResult<G>) -> G {
    res.unwrap_or_else(PoisonError::into_inner)
}

//! Typed error definitions for episode_mover.
//! `RelocateError` is the terminal failure reason of a single relocation;
//! `EpisodeMoverError` covers input problems found before any move starts.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why a relocation task failed (or, for `DeleteFailed`, what it left behind).
#[derive(Debug, Error)]
pub enum RelocateError {
    #[error("source '{}' is not a readable regular file", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("destination '{}' is not writable: {reason}", path.display())]
    DestinationUnwritable { path: PathBuf, reason: String },

    #[error("copy '{}' -> '{}' failed", from.display(), to.display())]
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Non-fatal: the copy finished but the original could not be removed.
    #[error("copied, but could not remove source '{}'", path.display())]
    DeleteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("move cancelled")]
    Cancelled,

    #[error("destination '{}' is already claimed by another job in this batch", path.display())]
    DuplicateDestination { path: PathBuf },
}

impl RelocateError {
    /// Stable short identifier, used as the `kind` field in structured logs.
    pub fn code(&self) -> &'static str {
        match self {
            RelocateError::SourceUnavailable { .. } => "source_unavailable",
            RelocateError::DestinationUnwritable { .. } => "destination_unwritable",
            RelocateError::CopyFailed { .. } => "copy_failed",
            RelocateError::DeleteFailed { .. } => "delete_failed",
            RelocateError::Cancelled => "cancelled",
            RelocateError::DuplicateDestination { .. } => "duplicate_destination",
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RelocateError::Cancelled)
    }

    pub(crate) fn unwritable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        RelocateError::DestinationUnwritable {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Problems with the requested work itself (bad batch lines, missing arguments).
#[derive(Debug, Error)]
pub enum EpisodeMoverError {
    #[error("batch line {line}: {reason}")]
    BatchLine { line: usize, reason: String },

    #[error("nothing to move: pass a SOURCE with --dest or --show, or use --batch FILE")]
    NoWork,

    #[error("{0} of {1} moves failed")]
    MovesFailed(usize, usize),
}

impl EpisodeMoverError {
    pub fn code(&self) -> &'static str {
        match self {
            EpisodeMoverError::BatchLine { .. } => "batch_line",
            EpisodeMoverError::NoWork => "no_work",
            EpisodeMoverError::MovesFailed(..) => "moves_failed",
        }
    }
}

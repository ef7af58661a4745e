//! An episode file queued for relocation.

use std::path::{Path, PathBuf};

use crate::errors::RelocateError;

use super::relocate::Relocation;

/// Outcome of the latest relocation attempt on an [`Episode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveState {
    #[default]
    Pending,
    Moved,
    Failed,
}

/// A media file plus the state of its last move.
///
/// The path only changes once a move has been confirmed; after a failure it
/// still points at the original file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Episode {
    path: PathBuf,
    state: MoveState,
}

impl Episode {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: MoveState::Pending,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> MoveState {
        self.state
    }

    pub(crate) fn record(&mut self, outcome: &Result<Relocation, RelocateError>) {
        match outcome {
            Ok(moved) => {
                self.path = moved.destination.clone();
                self.state = MoveState::Moved;
            }
            Err(_) => self.state = MoveState::Failed,
        }
    }
}

//! Relocation engine.
//!
//! Moves one episode file to its computed destination:
//! 1. source must be an existing regular file;
//! 2. the destination's parent is created when missing;
//! 3. the destination must be writable (fresh name in a writable directory,
//!    or an existing writable file);
//! 4. an existing destination that is already the source file (hard link,
//!    symlinked directory) is never truncated: the extra source link is
//!    dropped, or nothing happens when both paths are one directory entry;
//! 5. same filesystem root => atomic rename;
//! 6. different roots, or a failed rename => chunked copy, then delete the
//!    source (a failed delete is only a warning);
//! 7. touch timestamps, then report through the notifier.
//!
//! Cancellation is honoured only between copy chunks; a cancelled copy leaves
//! the partial destination on disk and the source untouched.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::errors::RelocateError;

use super::atomic::try_atomic_move;
use super::copy::{COPY_CHUNK_SIZE, CopyEnd, copy_chunked};
use super::episode::Episode;
use super::meta::touch_after_move;
use super::notifier::MoveNotifier;
use super::roots::{RootProvider, SystemRoots, absolutize, is_same_disk};
use super::util::{entry_path, is_cross_device, is_same_file, is_writable_probe};

/// Per-call preferences, read from configuration when a batch starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelocateOptions {
    /// Also bump the mtime of the destination's parent and grandparent.
    pub touch_ancestors: bool,
    pub chunk_size: usize,
}

impl Default for RelocateOptions {
    fn default() -> Self {
        Self {
            touch_ancestors: false,
            chunk_size: COPY_CHUNK_SIZE,
        }
    }
}

impl From<&Config> for RelocateOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            touch_ancestors: cfg.touch_ancestors,
            ..Self::default()
        }
    }
}

/// Which strategy actually moved the bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveMethod {
    Rename,
    Copy,
}

/// A successful relocation.
#[derive(Debug)]
pub struct Relocation {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub method: MoveMethod,
    pub bytes: u64,
    /// Set when the copy succeeded but the source could not be removed.
    pub source_cleanup: Option<RelocateError>,
}

pub struct Relocator {
    roots: Arc<dyn RootProvider>,
}

impl std::fmt::Debug for Relocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Relocator").finish_non_exhaustive()
    }
}

impl Default for Relocator {
    fn default() -> Self {
        Self::new(SystemRoots)
    }
}

impl Relocator {
    pub fn new(roots: impl RootProvider + 'static) -> Self {
        Self {
            roots: Arc::new(roots),
        }
    }

    /// Move `source` to `dest`, reporting through `notifier`.
    pub fn relocate(
        &self,
        source: &Path,
        dest: &Path,
        opts: &RelocateOptions,
        notifier: &dyn MoveNotifier,
    ) -> Result<Relocation, RelocateError> {
        notifier.started();
        let outcome = self.run(source, dest, opts, notifier);
        match &outcome {
            Ok(done) => notifier.success(done),
            Err(reason) => notifier.failed(reason),
        }
        outcome
    }

    /// Relocate an episode; its path is replaced only when the move succeeds.
    pub fn relocate_episode(
        &self,
        episode: &mut Episode,
        dest: &Path,
        opts: &RelocateOptions,
        notifier: &dyn MoveNotifier,
    ) -> Result<Relocation, RelocateError> {
        let source = episode.path().to_path_buf();
        let outcome = self.relocate(&source, dest, opts, notifier);
        episode.record(&outcome);
        outcome
    }

    fn same_disk(&self, source: &Path, dest: &Path) -> bool {
        match self.roots.roots() {
            Ok(roots) => is_same_disk(&roots, source, dest),
            Err(e) => {
                debug!(error = %e, "could not list filesystem roots; assuming same disk");
                true
            }
        }
    }

    fn run(
        &self,
        source: &Path,
        dest: &Path,
        opts: &RelocateOptions,
        notifier: &dyn MoveNotifier,
    ) -> Result<Relocation, RelocateError> {
        let src_len = source_len(source)?;

        if absolutize(source) == absolutize(dest) {
            info!(path = %source.display(), "already in place");
            touch_after_move(dest, opts.touch_ancestors);
            return Ok(Relocation {
                source: source.to_path_buf(),
                destination: dest.to_path_buf(),
                method: MoveMethod::Rename,
                bytes: src_len,
                source_cleanup: None,
            });
        }

        ensure_parent(dest)?;
        ensure_destination_writable(dest)?;

        if is_same_file(source, dest).unwrap_or(false) {
            return Ok(settle_linked(source, dest, src_len, opts));
        }

        if self.same_disk(source, dest) {
            match try_atomic_move(source, dest) {
                Ok(()) => {
                    info!(src = %source.display(), dest = %dest.display(), "renamed atomically");
                    touch_after_move(dest, opts.touch_ancestors);
                    return Ok(Relocation {
                        source: source.to_path_buf(),
                        destination: dest.to_path_buf(),
                        method: MoveMethod::Rename,
                        bytes: src_len,
                        source_cleanup: None,
                    });
                }
                Err(e) => {
                    let hint = if is_cross_device(&e) {
                        "cross-filesystem; will copy instead"
                    } else {
                        "falling back to copy"
                    };
                    warn!(error = %e, hint, src = %source.display(), "atomic rename failed");
                }
            }
        } else {
            debug!(src = %source.display(), dest = %dest.display(), "different filesystem roots; copying");
        }

        let bytes = match copy_chunked(source, dest, opts.chunk_size, |done, total| {
            notifier.progress(done, total)
        }) {
            Ok(CopyEnd::Completed(n)) => n,
            Ok(CopyEnd::Cancelled(n)) => {
                warn!(dest = %dest.display(), bytes = n, "copy cancelled; partial destination left on disk");
                return Err(RelocateError::Cancelled);
            }
            Err(e) => {
                return Err(RelocateError::CopyFailed {
                    from: source.to_path_buf(),
                    to: dest.to_path_buf(),
                    source: e,
                });
            }
        };

        let source_cleanup = match fs::remove_file(source) {
            Ok(()) => None,
            Err(e) => {
                let err = RelocateError::DeleteFailed {
                    path: source.to_path_buf(),
                    source: e,
                };
                warn!(error = %err, kind = err.code(), "source left behind after successful copy");
                Some(err)
            }
        };

        info!(src = %source.display(), dest = %dest.display(), bytes, "copied and removed source");
        touch_after_move(dest, opts.touch_ancestors);
        Ok(Relocation {
            source: source.to_path_buf(),
            destination: dest.to_path_buf(),
            method: MoveMethod::Copy,
            bytes,
            source_cleanup,
        })
    }
}

/// `dest` already is the source file. Copying would truncate the very bytes
/// being read, so only the surplus source link is removed.
fn settle_linked(source: &Path, dest: &Path, src_len: u64, opts: &RelocateOptions) -> Relocation {
    let one_entry = match (entry_path(source), entry_path(dest)) {
        (Ok(a), Ok(b)) => a == b,
        // Cannot tell the entries apart: keep both rather than risk the only copy.
        _ => true,
    };
    let source_cleanup = if one_entry {
        info!(src = %source.display(), dest = %dest.display(), "destination is the source entry; nothing to move");
        None
    } else {
        match fs::remove_file(source) {
            Ok(()) => {
                info!(src = %source.display(), dest = %dest.display(), "destination already linked to source; removed source link");
                None
            }
            Err(e) => {
                let err = RelocateError::DeleteFailed {
                    path: source.to_path_buf(),
                    source: e,
                };
                warn!(error = %err, kind = err.code(), "source link left behind");
                Some(err)
            }
        }
    };
    touch_after_move(dest, opts.touch_ancestors);
    Relocation {
        source: source.to_path_buf(),
        destination: dest.to_path_buf(),
        method: MoveMethod::Rename,
        bytes: src_len,
        source_cleanup,
    }
}

fn source_len(source: &Path) -> Result<u64, RelocateError> {
    let unavailable = |e: io::Error| RelocateError::SourceUnavailable {
        path: source.to_path_buf(),
        source: e,
    };
    let meta = fs::metadata(source).map_err(unavailable)?;
    if !meta.is_file() {
        return Err(unavailable(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }
    Ok(meta.len())
}

fn ensure_parent(dest: &Path) -> Result<(), RelocateError> {
    let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if parent.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(parent).map_err(|e| {
        RelocateError::unwritable(
            dest,
            super::helpers::describe_io_error("create destination directory", parent, &e),
        )
    })?;
    debug!(dir = %parent.display(), "created destination directory");
    Ok(())
}

fn ensure_destination_writable(dest: &Path) -> Result<(), RelocateError> {
    match fs::symlink_metadata(dest) {
        Ok(meta) => {
            if !meta.is_file() {
                return Err(RelocateError::unwritable(dest, "exists and is not a regular file"));
            }
            if meta.permissions().readonly() {
                return Err(RelocateError::unwritable(dest, "existing file is read-only"));
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            let parent = dest
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            is_writable_probe(parent).map_err(|e| {
                RelocateError::unwritable(
                    dest,
                    super::helpers::describe_io_error("write probe in", parent, &e),
                )
            })
        }
        Err(e) => Err(RelocateError::unwritable(
            dest,
            super::helpers::describe_io_error("stat destination", dest, &e),
        )),
    }
}

//! Atomic rename helper.
//! - An existing destination file is replaced by the rename itself (`rename(2)`
//!   on Unix, `MoveFileExW` with `MOVEFILE_REPLACE_EXISTING` on Windows), so a
//!   failed rename leaves it intact for the copy fallback.
//! - On Unix, best-effort fsync of the destination directory after the rename.
//!
//! Returns the raw io::Error so the caller can tell EXDEV apart from permission
//! problems when it decides to fall back to copying.

use std::fs;
use std::io;
use std::path::Path;

pub(super) fn try_atomic_move(src: &Path, dst: &Path) -> io::Result<()> {
    fs::rename(src, dst)?;

    // Ignore fsync errors: the rename itself already happened.
    if let Some(parent) = dst.parent() {
        let _ = super::util::fsync_dir(parent);
    }
    Ok(())
}

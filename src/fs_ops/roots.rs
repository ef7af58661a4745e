//! Filesystem root enumeration and the "same disk" heuristic.
//!
//! The engine only attempts an atomic rename when source and destination sit
//! under the same filesystem root. Roots come from a `RootProvider`:
//! `SystemRoots` asks the OS for its mount points, `FixedRoots` is a static
//! list (tests use it to force detection to agree or disagree).
//!
//! Known limitation: this is a lexical prefix test. Symlinks, bind mounts and
//! network mounts can make two paths look alike while living on different
//! devices (or the reverse). A wrong "same disk" answer is harmless because a
//! failed rename falls back to copying; a wrong "different disk" answer only
//! costs a copy.

use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Source of the filesystem roots considered by the same-disk check.
pub trait RootProvider: Send + Sync {
    fn roots(&self) -> io::Result<Vec<PathBuf>>;
}

/// Mount points reported by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRoots;

impl RootProvider for SystemRoots {
    fn roots(&self) -> io::Result<Vec<PathBuf>> {
        crate::platform::list_filesystem_roots()
    }
}

/// A fixed list of roots.
#[derive(Debug, Clone, Default)]
pub struct FixedRoots(Vec<PathBuf>);

impl FixedRoots {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self(roots.into_iter().map(Into::into).collect())
    }
}

impl RootProvider for FixedRoots {
    fn roots(&self) -> io::Result<Vec<PathBuf>> {
        Ok(self.0.clone())
    }
}

/// Absolute form of `p` without touching the filesystem (the destination
/// usually does not exist yet, so canonicalize is not an option).
pub(crate) fn absolutize(p: &Path) -> PathBuf {
    let abs = std::path::absolute(p).unwrap_or_else(|_| p.to_path_buf());
    dunce::simplified(&abs).to_path_buf()
}

/// Same-disk test:
/// - fewer than two roots: always the same disk;
/// - otherwise pick the longest root prefixing the source, and require the
///   destination to be prefixed by that same root.
pub fn is_same_disk(roots: &[PathBuf], src: &Path, dest: &Path) -> bool {
    if roots.len() < 2 {
        return true;
    }
    let src_abs = absolutize(src);
    let dest_abs = absolutize(dest);

    let src_root = roots
        .iter()
        .map(|r| absolutize(r))
        .filter(|r| src_abs.starts_with(r))
        .max_by_key(|r| r.components().count());

    match src_root {
        Some(root) => {
            let same = dest_abs.starts_with(&root);
            debug!(root = %root.display(), same, "same-disk check");
            same
        }
        None => {
            debug!(src = %src_abs.display(), "source under no known root; treating as different disk");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roots(list: &[&str]) -> Vec<PathBuf> {
        list.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn single_root_is_always_same_disk() {
        assert!(is_same_disk(&roots(&["/"]), Path::new("/a/x"), Path::new("/b/y")));
        assert!(is_same_disk(&[], Path::new("/a/x"), Path::new("/b/y")));
    }

    #[cfg(unix)]
    #[test]
    fn distinct_roots_disagree() {
        let r = roots(&["/diskA", "/diskB"]);
        assert!(!is_same_disk(&r, Path::new("/diskA/file.mp4"), Path::new("/diskB/Show/ep.mp4")));
        assert!(is_same_disk(&r, Path::new("/diskA/in/file.mp4"), Path::new("/diskA/TV/ep.mp4")));
    }

    #[cfg(unix)]
    #[test]
    fn prefix_match_is_per_component() {
        let r = roots(&["/disk1", "/disk10"]);
        assert!(!is_same_disk(&r, Path::new("/disk1/a.mkv"), Path::new("/disk10/a.mkv")));
    }

    #[cfg(unix)]
    #[test]
    fn longest_source_root_wins() {
        let r = roots(&["/", "/mnt/usb"]);
        // Source on the nested mount: destination on "/" is a different disk.
        assert!(!is_same_disk(&r, Path::new("/mnt/usb/a.mkv"), Path::new("/home/tv/a.mkv")));
        // Source on "/": every absolute destination starts with "/", so the
        // heuristic says same disk even for the nested mount (rename then
        // fails with EXDEV and the engine copies).
        assert!(is_same_disk(&r, Path::new("/home/a.mkv"), Path::new("/mnt/usb/a.mkv")));
    }

    #[cfg(unix)]
    #[test]
    fn source_outside_all_roots_is_different_disk() {
        let r = roots(&["/diskA", "/diskB"]);
        assert!(!is_same_disk(&r, Path::new("/elsewhere/a.mkv"), Path::new("/diskA/a.mkv")));
    }

    #[test]
    fn system_roots_are_listed() {
        let list = SystemRoots.roots().unwrap();
        assert!(!list.is_empty());
    }
}

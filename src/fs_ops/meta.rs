//! Post-move timestamp touch-up.
//! Sets the destination's mtime to "now" and, when asked, the mtime of its
//! parent and grandparent directories so the show/season folders sort as
//! recently changed in file browsers.
//! Best-effort: every failure is trace-logged and ignored.

use filetime::{FileTime, set_file_mtime};
use std::path::Path;
use tracing::trace;

pub(super) fn touch_after_move(dest: &Path, touch_ancestors: bool) {
    let now = FileTime::now();
    touch(dest, now);

    if !touch_ancestors {
        return;
    }
    let mut current = dest.parent();
    for _ in 0..2 {
        match current {
            Some(dir) if !dir.as_os_str().is_empty() => {
                touch(dir, now);
                current = dir.parent();
            }
            _ => break,
        }
    }
}

fn touch(path: &Path, when: FileTime) {
    match set_file_mtime(path, when) {
        Ok(()) => trace!(path = %path.display(), "set mtime"),
        Err(e) => trace!(path = %path.display(), error = %e, "could not set mtime; ignoring"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{Duration, SystemTime};
    use tempfile::tempdir;

    fn backdate(path: &Path) -> FileTime {
        let old = FileTime::from_system_time(SystemTime::now() - Duration::from_secs(86_400));
        set_file_mtime(path, old).unwrap();
        old
    }

    fn mtime(path: &Path) -> FileTime {
        FileTime::from_last_modification_time(&fs::metadata(path).unwrap())
    }

    #[test]
    fn ancestors_untouched_unless_requested() {
        let td = tempdir().unwrap();
        let season = td.path().join("Show").join("Season 01");
        fs::create_dir_all(&season).unwrap();
        let file = season.join("ep.mkv");
        fs::write(&file, b"x").unwrap();
        backdate(&file);
        let old_season = backdate(&season);

        touch_after_move(&file, false);
        assert!(mtime(&file) > old_season);
        assert_eq!(mtime(&season), old_season);
    }

    #[test]
    fn touches_parent_and_grandparent_only() {
        let td = tempdir().unwrap();
        let root = td.path().join("TV");
        let show = root.join("Show");
        let season = show.join("Season 01");
        fs::create_dir_all(&season).unwrap();
        let file = season.join("ep.mkv");
        fs::write(&file, b"x").unwrap();
        let old_root = backdate(&root);
        let old_show = backdate(&show);
        let old_season = backdate(&season);

        touch_after_move(&file, true);
        assert!(mtime(&season) > old_season);
        assert!(mtime(&show) > old_show);
        assert_eq!(mtime(&root), old_root);
    }
}

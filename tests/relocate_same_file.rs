use episode_mover::{FixedRoots, MoveMethod, MoveNotifier, RelocateOptions, Relocator};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::tempdir;

const LEN: usize = 100_000;

fn payload() -> Vec<u8> {
    (0..LEN).map(|i| (i % 241) as u8).collect()
}

#[derive(Default)]
struct CountProgress(AtomicUsize);

impl MoveNotifier for CountProgress {
    fn progress(&self, _: u64, _: u64) -> bool {
        self.0.fetch_add(1, Ordering::SeqCst);
        true
    }
}

fn linked_pair(src_dir: &Path, dest_dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    fs::create_dir_all(src_dir).unwrap();
    fs::create_dir_all(dest_dir).unwrap();
    let src = src_dir.join("ep.mkv");
    let dest = dest_dir.join("ep.mkv");
    fs::write(&src, payload()).unwrap();
    fs::hard_link(&src, &dest).unwrap();
    (src, dest)
}

#[test]
fn hard_linked_destination_survives_cross_disk_move() {
    let td = tempdir().unwrap();
    let a = td.path().join("diskA");
    let b = td.path().join("diskB");
    let (src, dest) = linked_pair(&a, &b);
    let notifier = CountProgress::default();

    let done = Relocator::new(FixedRoots::new([a, b]))
        .relocate(&src, &dest, &RelocateOptions::default(), &notifier)
        .unwrap();

    assert!(!src.exists());
    assert_eq!(fs::read(&dest).unwrap(), payload());
    assert_eq!(done.bytes, LEN as u64);
    assert!(done.source_cleanup.is_none());
    assert_eq!(notifier.0.load(Ordering::SeqCst), 0, "nothing may be copied");
}

#[test]
fn hard_linked_destination_on_same_disk_drops_source_link() {
    let td = tempdir().unwrap();
    let (src, dest) = linked_pair(&td.path().join("incoming"), &td.path().join("TV"));

    let done = Relocator::new(FixedRoots::default())
        .relocate(&src, &dest, &RelocateOptions::default(), &CountProgress::default())
        .unwrap();

    assert_eq!(done.method, MoveMethod::Rename);
    assert!(!src.exists());
    assert_eq!(fs::read(&dest).unwrap(), payload());
}

#[cfg(unix)]
#[test]
fn path_through_symlinked_directory_is_left_alone() {
    let td = tempdir().unwrap();
    let a = td.path().join("diskA");
    let b = td.path().join("diskB");
    let real = a.join("Show");
    fs::create_dir_all(&real).unwrap();
    fs::create_dir_all(&b).unwrap();
    let src = real.join("ep.mkv");
    fs::write(&src, payload()).unwrap();
    let alias = b.join("Show");
    std::os::unix::fs::symlink(&real, &alias).unwrap();
    let dest = alias.join("ep.mkv");

    let done = Relocator::new(FixedRoots::new([a, b]))
        .relocate(&src, &dest, &RelocateOptions::default(), &CountProgress::default())
        .unwrap();

    assert!(done.source_cleanup.is_none());
    assert_eq!(fs::read(&src).unwrap(), payload());
    assert_eq!(fs::read(&dest).unwrap(), payload());
}

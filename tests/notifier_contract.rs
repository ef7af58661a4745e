//! Call discipline: one `started` first, optional progress, one terminal call last.

use episode_mover::{
    FixedRoots, MoveNotifier, RelocateError, RelocateOptions, Relocation, Relocator,
};
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use tempfile::tempdir;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Started,
    Progress,
    Success,
    Failed(&'static str),
}

#[derive(Default)]
struct Recorder(Mutex<Vec<Event>>);

impl Recorder {
    fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }
}

impl MoveNotifier for Recorder {
    fn started(&self) {
        self.0.lock().unwrap().push(Event::Started);
    }
    fn progress(&self, _: u64, _: u64) -> bool {
        self.0.lock().unwrap().push(Event::Progress);
        true
    }
    fn success(&self, _: &Relocation) {
        self.0.lock().unwrap().push(Event::Success);
    }
    fn failed(&self, reason: &RelocateError) {
        self.0.lock().unwrap().push(Event::Failed(reason.code()));
    }
}

fn assert_discipline(events: &[Event]) {
    assert_eq!(events.first(), Some(&Event::Started));
    assert_eq!(events.iter().filter(|e| **e == Event::Started).count(), 1);
    let terminals = events
        .iter()
        .filter(|e| matches!(e, Event::Success | Event::Failed(_)))
        .count();
    assert_eq!(terminals, 1);
    assert!(matches!(events.last(), Some(Event::Success | Event::Failed(_))));
}

fn relocate(roots: FixedRoots, src: &Path, dest: &Path) -> Vec<Event> {
    let rec = Recorder::default();
    let _ = Relocator::new(roots).relocate(src, dest, &RelocateOptions::default(), &rec);
    rec.events()
}

#[test]
fn rename_path() {
    let td = tempdir().unwrap();
    let src = td.path().join("a.mkv");
    fs::write(&src, b"a").unwrap();
    let events = relocate(FixedRoots::default(), &src, &td.path().join("b.mkv"));
    assert_discipline(&events);
    assert_eq!(events, vec![Event::Started, Event::Success]);
}

#[test]
fn copy_path() {
    let td = tempdir().unwrap();
    let (a, b) = (td.path().join("A"), td.path().join("B"));
    fs::create_dir_all(&a).unwrap();
    fs::create_dir_all(&b).unwrap();
    let src = a.join("a.mkv");
    fs::write(&src, vec![0u8; 100_000]).unwrap();
    let events = relocate(FixedRoots::new([&a, &b]), &src, &b.join("a.mkv"));
    assert_discipline(&events);
    assert!(events.contains(&Event::Progress));
}

#[test]
fn failure_path() {
    let td = tempdir().unwrap();
    let events = relocate(
        FixedRoots::default(),
        &td.path().join("missing.mkv"),
        &td.path().join("b.mkv"),
    );
    assert_discipline(&events);
    assert_eq!(events, vec![Event::Started, Event::Failed("source_unavailable")]);
}

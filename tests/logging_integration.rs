use std::fs;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use episode_mover::{FixedRoots, NoopNotifier, RelocateOptions, Relocator};
use tempfile::tempdir;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt as tsfmt, registry};

/// Appends formatted events to a shared in-memory buffer.
#[derive(Clone)]
struct BufferWriter(Arc<Mutex<Vec<u8>>>);

impl Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn capture(level: &str, f: impl FnOnce()) -> String {
    let buf = Arc::new(Mutex::new(Vec::new()));
    let make_writer = {
        let buf = buf.clone();
        move || BufferWriter(buf.clone())
    };
    let layer = tsfmt::layer()
        .with_writer(make_writer)
        .with_ansi(false)
        .compact();
    let subscriber = registry().with(EnvFilter::new(level)).with(layer);
    let dispatch = tracing::Dispatch::new(subscriber);
    tracing::dispatcher::with_default(&dispatch, f);
    let guard = buf.lock().unwrap();
    String::from_utf8_lossy(&guard[..]).into_owned()
}

#[test]
fn rename_is_logged_at_info() {
    let td = tempdir().unwrap();
    let src = td.path().join("a.mkv");
    fs::write(&src, b"x").unwrap();
    let dest = td.path().join("TV").join("a.mkv");

    let logs = capture("info", || {
        Relocator::new(FixedRoots::default())
            .relocate(&src, &dest, &RelocateOptions::default(), &NoopNotifier)
            .unwrap();
    });

    assert!(logs.contains("renamed atomically"), "logs: {logs}");
    assert!(logs.contains("a.mkv"), "logs: {logs}");
}

#[test]
fn cross_disk_copy_is_logged() {
    let td = tempdir().unwrap();
    let a = td.path().join("diskA");
    let b = td.path().join("diskB");
    fs::create_dir_all(&a).unwrap();
    fs::create_dir_all(&b).unwrap();
    let src = a.join("ep.mkv");
    fs::write(&src, b"payload").unwrap();

    let logs = capture("debug", || {
        Relocator::new(FixedRoots::new([a.clone(), b.clone()]))
            .relocate(&src, &b.join("ep.mkv"), &RelocateOptions::default(), &NoopNotifier)
            .unwrap();
    });

    assert!(logs.contains("different filesystem roots; copying"), "logs: {logs}");
    assert!(logs.contains("copied and removed source"), "logs: {logs}");
}

#[test]
fn quiet_filter_drops_info_events() {
    let td = tempdir().unwrap();
    let src = td.path().join("a.mkv");
    fs::write(&src, b"x").unwrap();

    let logs = capture("error", || {
        Relocator::new(FixedRoots::default())
            .relocate(&src, &td.path().join("b.mkv"), &RelocateOptions::default(), &NoopNotifier)
            .unwrap();
    });

    assert!(logs.is_empty(), "logs: {logs}");
}

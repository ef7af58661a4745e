use episode_mover::{
    BatchSummary, COPY_CHUNK_SIZE, CancelToken, FixedRoots, MoveJob, MoveNotifier, Orchestrator,
    RelocateError, RelocateOptions, Relocator,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::tempdir;

fn cross_disk_batch(root: &Path, n: usize, size: usize) -> (Relocator, Vec<MoveJob>) {
    let a = root.join("diskA");
    let b = root.join("diskB");
    fs::create_dir_all(&a).unwrap();
    fs::create_dir_all(&b).unwrap();
    let jobs = (0..n)
        .map(|i| {
            let src = a.join(format!("ep{i}.mkv"));
            fs::write(&src, vec![i as u8; size]).unwrap();
            MoveJob::new(src, b.join(format!("ep{i}.mkv")))
        })
        .collect();
    (Relocator::new(FixedRoots::new([a, b])), jobs)
}

#[test]
fn cancelled_before_run_touches_nothing() {
    let td = tempdir().unwrap();
    let (relocator, jobs) = cross_disk_batch(td.path(), 3, 10);
    let orch = Orchestrator::new(2, relocator, RelocateOptions::default()).unwrap();
    orch.cancel_token().cancel();

    let events = std::sync::Arc::new(Mutex::new(Vec::new()));
    struct Log(std::sync::Arc<Mutex<Vec<&'static str>>>);
    impl MoveNotifier for Log {
        fn started(&self) {
            self.0.lock().unwrap().push("started");
        }
        fn failed(&self, e: &RelocateError) {
            self.0.lock().unwrap().push(e.code());
        }
    }
    let ev = std::sync::Arc::clone(&events);
    let outcomes = orch.run(jobs, move |_| Box::new(Log(std::sync::Arc::clone(&ev))));

    for o in &outcomes {
        assert!(matches!(o.result, Err(RelocateError::Cancelled)));
        assert!(o.job.source.exists());
        assert!(!o.job.destination.exists());
    }
    let events = events.lock().unwrap();
    assert_eq!(events.iter().filter(|e| **e == "started").count(), 3);
    assert_eq!(events.iter().filter(|e| **e == "cancelled").count(), 3);
    assert_eq!(BatchSummary::from_outcomes(&outcomes).cancelled, 3);
}

/// Cancels the whole batch from inside the first progress callback.
struct PullTheCord(CancelToken);

impl MoveNotifier for PullTheCord {
    fn progress(&self, _: u64, _: u64) -> bool {
        self.0.cancel();
        true
    }
}

#[test]
fn cancel_mid_copy_stops_in_flight_and_pending_jobs() {
    let td = tempdir().unwrap();
    let (relocator, jobs) = cross_disk_batch(td.path(), 3, 4 * COPY_CHUNK_SIZE);
    let sources: Vec<PathBuf> = jobs.iter().map(|j| j.source.clone()).collect();
    let orch = Orchestrator::new(1, relocator, RelocateOptions::default()).unwrap();
    let token = orch.cancel_token();

    let outcomes = orch.run(jobs, move |_| Box::new(PullTheCord(token.clone())));

    assert!(outcomes.iter().all(|o| matches!(o.result, Err(RelocateError::Cancelled))));
    for (i, src) in sources.iter().enumerate() {
        assert_eq!(fs::read(src).unwrap(), vec![i as u8; 4 * COPY_CHUNK_SIZE]);
    }
    let partials: Vec<_> = outcomes
        .iter()
        .filter(|o| o.job.destination.exists())
        .collect();
    assert_eq!(partials.len(), 1, "only the in-flight copy leaves a partial file");
    let len = fs::metadata(&partials[0].job.destination).unwrap().len();
    assert!(len < 4 * COPY_CHUNK_SIZE as u64);
}

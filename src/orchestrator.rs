//! Batch scheduling of relocations on a bounded worker pool.
//!
//! - one job per file; at most `workers` relocations run at once;
//! - outcomes come back in input order, one per job, never retried;
//! - a destination claimed earlier in the same batch fails the later job
//!   with `DuplicateDestination` before anything is touched;
//! - cancelling the batch token stops in-flight copies at the next chunk
//!   and fails jobs that have not started yet with `Cancelled`.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::cancel::CancelToken;
use crate::config::Config;
use crate::errors::RelocateError;
use crate::fs_ops::{
    Episode, MoveMethod, MoveNotifier, NoopNotifier, RelocateOptions, Relocation, Relocator,
    absolutize,
};

/// A source file and where it should end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveJob {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl MoveJob {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

#[derive(Debug)]
pub struct JobOutcome {
    pub job: MoveJob,
    pub result: Result<Relocation, RelocateError>,
}

/// An [`Episode`] and its destination; the episode's path follows a
/// successful move.
#[derive(Debug)]
pub struct EpisodeJob {
    pub episode: Episode,
    pub destination: PathBuf,
}

pub struct Orchestrator {
    pool: ThreadPool,
    relocator: Relocator,
    options: RelocateOptions,
    cancel: CancelToken,
}

impl Orchestrator {
    pub fn new(
        workers: usize,
        relocator: Relocator,
        options: RelocateOptions,
    ) -> Result<Self, ThreadPoolBuildError> {
        let workers = workers.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("mover-{i}"))
            .build()?;
        debug!(workers, "worker pool ready");
        Ok(Self {
            pool,
            relocator,
            options,
            cancel: CancelToken::new(),
        })
    }

    /// Pool size and options from `cfg`, system filesystem roots.
    pub fn from_config(cfg: &Config) -> Result<Self, ThreadPoolBuildError> {
        Self::new(cfg.workers, Relocator::default(), RelocateOptions::from(cfg))
    }

    /// Token shared by every job of this orchestrator; cancel it to stop the batch.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run every job; `notifier_for` supplies each job's notifier.
    pub fn run<F>(&self, jobs: Vec<MoveJob>, notifier_for: F) -> Vec<JobOutcome>
    where
        F: Fn(&MoveJob) -> Box<dyn MoveNotifier> + Sync,
    {
        let claims = first_claims(jobs.iter().map(|j| j.destination.as_path()));
        self.pool.install(|| {
            jobs.into_par_iter()
                .zip(claims)
                .map(|(job, first)| {
                    let notifier = notifier_for(&job);
                    let result =
                        self.dispatch(&job.source, &job.destination, first, notifier.as_ref());
                    JobOutcome { job, result }
                })
                .collect()
        })
    }

    pub fn run_silent(&self, jobs: Vec<MoveJob>) -> Vec<JobOutcome> {
        self.run(jobs, |_| Box::new(NoopNotifier))
    }

    /// Like [`run`](Self::run) for episodes, updating each episode in place.
    pub fn run_episodes(
        &self,
        jobs: &mut [EpisodeJob],
        notifier: &dyn MoveNotifier,
    ) -> Vec<Result<Relocation, RelocateError>> {
        let claims = first_claims(jobs.iter().map(|j| j.destination.as_path()));
        self.pool.install(|| {
            jobs.par_iter_mut()
                .zip(claims)
                .map(|(job, first)| {
                    let source = job.episode.path().to_path_buf();
                    let result = self.dispatch(&source, &job.destination, first, notifier);
                    job.episode.record(&result);
                    result
                })
                .collect()
        })
    }

    fn dispatch(
        &self,
        source: &Path,
        dest: &Path,
        first_claim: bool,
        notifier: &dyn MoveNotifier,
    ) -> Result<Relocation, RelocateError> {
        let rejected = if !first_claim {
            warn!(src = %source.display(), dest = %dest.display(), "destination already claimed in this batch");
            Some(RelocateError::DuplicateDestination {
                path: dest.to_path_buf(),
            })
        } else if self.cancel.is_cancelled() {
            debug!(src = %source.display(), "batch cancelled before job started");
            Some(RelocateError::Cancelled)
        } else {
            None
        };
        if let Some(err) = rejected {
            notifier.started();
            notifier.failed(&err);
            return Err(err);
        }

        let guarded = CancelAware {
            inner: notifier,
            cancel: &self.cancel,
        };
        self.relocator.relocate(source, dest, &self.options, &guarded)
    }
}

/// `true` for the first job naming each absolute destination.
fn first_claims<'a>(dests: impl Iterator<Item = &'a Path>) -> Vec<bool> {
    let mut seen = HashSet::new();
    dests.map(|d| seen.insert(absolutize(d))).collect()
}

/// Forwards to the caller's notifier; progress also answers `false` once the
/// batch is cancelled.
struct CancelAware<'a> {
    inner: &'a dyn MoveNotifier,
    cancel: &'a CancelToken,
}

impl MoveNotifier for CancelAware<'_> {
    fn started(&self) {
        self.inner.started();
    }

    fn progress(&self, bytes_so_far: u64, total_bytes: u64) -> bool {
        let keep_going = self.inner.progress(bytes_so_far, total_bytes);
        keep_going && !self.cancel.is_cancelled()
    }

    fn success(&self, relocation: &Relocation) {
        self.inner.success(relocation);
    }

    fn failed(&self, reason: &RelocateError) {
        self.inner.failed(reason);
    }
}

/// Counts over a finished batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub renamed: usize,
    pub copied: usize,
    /// Failures other than cancellation.
    pub failed: usize,
    pub cancelled: usize,
    pub bytes_copied: u64,
    /// Copies whose source could not be removed afterwards.
    pub sources_retained: usize,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[JobOutcome]) -> Self {
        Self::from_results(outcomes.iter().map(|o| &o.result))
    }

    pub fn from_results<'a>(
        results: impl IntoIterator<Item = &'a Result<Relocation, RelocateError>>,
    ) -> Self {
        let mut s = Self::default();
        for result in results {
            s.total += 1;
            match result {
                Ok(r) => {
                    match r.method {
                        MoveMethod::Rename => s.renamed += 1,
                        MoveMethod::Copy => {
                            s.copied += 1;
                            s.bytes_copied += r.bytes;
                        }
                    }
                    if r.source_cleanup.is_some() {
                        s.sources_retained += 1;
                    }
                }
                Err(e) if e.is_cancelled() => s.cancelled += 1,
                Err(_) => s.failed += 1,
            }
        }
        s
    }

    pub fn moved(&self) -> usize {
        self.renamed + self.copied
    }

    pub fn all_succeeded(&self) -> bool {
        self.moved() == self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_claims_flags_repeats_only() {
        let dests = [
            Path::new("/tv/a.mkv"),
            Path::new("/tv/b.mkv"),
            Path::new("/tv/./a.mkv"),
            Path::new("/tv/a.mkv"),
        ];
        assert_eq!(first_claims(dests.into_iter()), vec![true, true, false, false]);
    }

    #[test]
    fn workers_floor_at_one() {
        let o = Orchestrator::new(0, Relocator::default(), RelocateOptions::default()).unwrap();
        assert_eq!(o.workers(), 1);
    }

    #[test]
    fn summary_counts() {
        let ok = |method, bytes| {
            Ok(Relocation {
                source: PathBuf::from("s"),
                destination: PathBuf::from("d"),
                method,
                bytes,
                source_cleanup: None,
            })
        };
        let results = vec![
            ok(MoveMethod::Rename, 10),
            ok(MoveMethod::Copy, 7),
            Err(RelocateError::Cancelled),
            Err(RelocateError::DuplicateDestination {
                path: PathBuf::from("d"),
            }),
        ];
        let s = BatchSummary::from_results(&results);
        assert_eq!(s.total, 4);
        assert_eq!(s.moved(), 2);
        assert_eq!(s.bytes_copied, 7);
        assert_eq!(s.cancelled, 1);
        assert_eq!(s.failed, 1);
        assert!(!s.all_succeeded());
    }
}

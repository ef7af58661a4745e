//! Application flow.
//! Loads/merges config, initializes logging, plans the jobs, installs the
//! Ctrl-C handler and runs the batch through the orchestrator.

use anyhow::{Context, Result};
use std::error::Error as _;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, error, info, warn};

use episode_mover::cli::{Args, Request};
use episode_mover::config::{CONFIG_ENV, LoadResult, default_config_path, load_or_init};
use episode_mover::output as out;
use episode_mover::plan::{EpisodeRef, load_batch, plan_episode};
use episode_mover::{
    BatchSummary, Config, EpisodeMoverError, JobOutcome, MoveJob, MoveMethod, MoveNotifier,
    Orchestrator, RelocateError, Relocation, ShowRegistry,
};

use crate::logging::init_tracing;

pub fn run(args: Args) -> Result<()> {
    if args.print_config {
        print_config_location();
        return Ok(());
    }

    let mut cfg = match load_or_init()? {
        LoadResult::CreatedTemplate(path) => {
            out::print_success(&format!("A template config was written to: {}", path.display()));
            out::print_info("Set <library_base> (and optionally <workers>, <touch_ancestors>, <log_level>, <log_file>), then re-run.");
            out::print_info(&format!("To use a different location set {CONFIG_ENV}."));
            return Ok(());
        }
        LoadResult::Loaded(cfg, _) => cfg,
        LoadResult::Defaults(_) => Config::default(),
    };
    args.apply_overrides(&mut cfg);

    let guard = init_tracing(cfg.log_level, cfg.log_file.as_deref(), args.json).inspect_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {e}"));
    })?;
    debug!(?args, "starting episode_mover");

    let result = run_moves(&args, &cfg);
    if let Err(e) = &result {
        log_failure(e);
    }
    drop(guard);
    result
}

fn print_config_location() {
    match default_config_path() {
        Ok(p) => {
            let source = if std::env::var_os(CONFIG_ENV).is_some() {
                CONFIG_ENV
            } else {
                "default location"
            };
            out::print_info(&format!("Config file ({source}):\n  {}", p.display()));
            if !p.exists() {
                out::print_info("No file exists there yet; defaults apply.");
            }
        }
        Err(e) => out::print_error(&format!("Could not determine a config path: {e}")),
    }
}

fn log_failure(e: &anyhow::Error) {
    if let Some(em) = e.downcast_ref::<EpisodeMoverError>() {
        error!(code = em.code(), error = %em, "run failed");
    } else {
        error!(error = ?e, "run failed");
    }
}

fn plan_jobs(req: &Request, cfg: &Config) -> Result<Vec<MoveJob>> {
    let registry = ShowRegistry::new();
    let jobs = match req {
        Request::Single { source, dest } => vec![MoveJob::new(source, dest)],
        Request::Episode {
            source,
            show,
            season,
            episode,
            title,
        } => {
            let ep = EpisodeRef {
                show,
                season: *season,
                episode: *episode,
                title: title.as_deref(),
            };
            vec![plan_episode(source, &ep, &cfg.library_base, &registry)]
        }
        Request::Batch(path) => load_batch(path, &cfg.library_base, &registry)?,
    };
    debug!(jobs = jobs.len(), shows = registry.len(), "planned");
    Ok(jobs)
}

fn run_moves(args: &Args, cfg: &Config) -> Result<()> {
    let req = args.request()?;
    match req {
        Request::Single { .. } => cfg.validate_workers()?,
        _ => cfg.validate()?,
    }

    let jobs = plan_jobs(&req, cfg)?;
    if jobs.is_empty() {
        return Err(EpisodeMoverError::NoWork.into());
    }

    let orchestrator = Orchestrator::from_config(cfg).context("start worker pool")?;
    let token = orchestrator.cancel_token();
    if let Err(e) = ctrlc::set_handler(move || {
        token.cancel();
        out::print_warn("Interrupt received; stopping after the current chunk...");
    }) {
        warn!(error = %e, "could not install Ctrl-C handler");
    }

    info!(
        jobs = jobs.len(),
        workers = orchestrator.workers(),
        library = %cfg.library_base.display(),
        "starting batch"
    );
    let outcomes = orchestrator.run(jobs, |job| Box::new(ProgressReporter::new(job)));
    report(&outcomes);

    let summary = BatchSummary::from_outcomes(&outcomes);
    info!(
        moved = summary.moved(),
        renamed = summary.renamed,
        copied = summary.copied,
        failed = summary.failed,
        cancelled = summary.cancelled,
        bytes_copied = summary.bytes_copied,
        "batch finished"
    );
    if summary.total > 1 {
        out::print_info(&format!(
            "{} of {} moved ({} renamed, {} copied, {}), {} failed, {} cancelled",
            summary.moved(),
            summary.total,
            summary.renamed,
            summary.copied,
            out::human_bytes(summary.bytes_copied),
            summary.failed,
            summary.cancelled
        ));
    }
    if summary.all_succeeded() {
        Ok(())
    } else {
        Err(EpisodeMoverError::MovesFailed(summary.total - summary.moved(), summary.total).into())
    }
}

fn report(outcomes: &[JobOutcome]) {
    for outcome in outcomes {
        match &outcome.result {
            Ok(done) => {
                out::print_user(&format!(
                    "moved {} -> {}",
                    done.source.display(),
                    done.destination.display()
                ));
                if let Some(left) = &done.source_cleanup {
                    out::print_warn(&format!("{left}; remove it by hand"));
                }
            }
            Err(e) => {
                error!(
                    code = e.code(),
                    src = %outcome.job.source.display(),
                    dest = %outcome.job.destination.display(),
                    error = %e,
                    "move failed"
                );
                out::print_error(&format!("{}: {}", outcome.job.source.display(), error_chain(e)));
            }
        }
    }
}

fn error_chain(e: &RelocateError) -> String {
    let mut msg = e.to_string();
    let mut cur = e.source();
    while let Some(inner) = cur {
        msg.push_str(": ");
        msg.push_str(&inner.to_string());
        cur = inner.source();
    }
    msg
}

/// Per-job notifier: logs lifecycle events and copy progress every 10%.
struct ProgressReporter {
    label: String,
    last_decile: AtomicU64,
}

impl ProgressReporter {
    fn new(job: &MoveJob) -> Self {
        Self {
            label: file_label(&job.source),
            last_decile: AtomicU64::new(0),
        }
    }
}

fn file_label(p: &Path) -> String {
    p.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| p.display().to_string())
}

impl MoveNotifier for ProgressReporter {
    fn started(&self) {
        debug!(file = %self.label, "move started");
    }

    fn progress(&self, bytes_so_far: u64, total_bytes: u64) -> bool {
        if total_bytes > 0 {
            let decile = bytes_so_far.saturating_mul(10) / total_bytes;
            if decile > self.last_decile.swap(decile, Ordering::Relaxed) {
                info!(file = %self.label, percent = decile * 10, bytes = bytes_so_far, "copying");
            }
        }
        true
    }

    fn success(&self, relocation: &Relocation) {
        let method = match relocation.method {
            MoveMethod::Rename => "rename",
            MoveMethod::Copy => "copy",
        };
        info!(file = %self.label, method, bytes = relocation.bytes, "move finished");
    }

    fn failed(&self, reason: &RelocateError) {
        debug!(file = %self.label, code = reason.code(), "move failed");
    }
}

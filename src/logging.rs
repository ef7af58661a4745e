//! Tracing initialization.
//!
//! - Verbosity comes from `LogLevel` only (RUST_LOG is not consulted).
//! - Console events go to stderr so stdout stays free for `moved a -> b`
//!   lines; compact or JSON per the `json` flag.
//! - A non-blocking file layer is added when a log file is configured and
//!   no ancestor of it is a symlink.

use anyhow::Result;
use chrono::Local;
use episode_mover::config::default_log_path;
use episode_mover::output as out;
use episode_mover::platform::open_log_file_secure_append;
use episode_mover::{LogLevel, path_has_symlink_ancestor};
use std::fmt as stdfmt;
use std::path::Path;
use tracing::Subscriber;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, fmt as tsfmt, registry};

/// DD/MM/YY HH:MM:SS in local time.
struct LocalHumanTime;

impl FormatTime for LocalHumanTime {
    fn format_time(&self, w: &mut Writer<'_>) -> stdfmt::Result {
        write!(w, "{}", Local::now().format("%d/%m/%y %H:%M:%S"))
    }
}

pub(crate) fn to_level_filter(lvl: LogLevel) -> LevelFilter {
    match lvl {
        LogLevel::Quiet => LevelFilter::ERROR,
        LogLevel::Normal => LevelFilter::INFO,
        LogLevel::Info => LevelFilter::DEBUG,
        LogLevel::Debug => LevelFilter::TRACE,
    }
}

fn fmt_layer<S, W>(json: bool, ansi: bool, writer: W) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tsfmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_level(true)
        .with_target(true)
        .with_thread_names(true);
    if json {
        layer
            .event_format(tsfmt::format().json().with_timer(LocalHumanTime))
            .boxed()
    } else {
        layer
            .event_format(tsfmt::format().compact().with_timer(LocalHumanTime))
            .boxed()
    }
}

/// Open `path` for non-blocking appends, or explain on stderr why not.
fn open_file_writer(path: &Path) -> Option<(NonBlocking, WorkerGuard)> {
    match path_has_symlink_ancestor(path) {
        Ok(false) => {}
        Ok(true) => {
            out::print_warn(&format!(
                "Refusing file logging: an ancestor of {} is a symlink.",
                path.display()
            ));
            return None;
        }
        Err(e) => {
            out::print_warn(&format!("Cannot check log path {}: {e}", path.display()));
            return None;
        }
    }
    match open_log_file_secure_append(path) {
        Ok(file) => Some(tracing_appender::non_blocking(file)),
        Err(e) => {
            out::print_warn(&format!("Cannot open log file {}: {e}", path.display()));
            None
        }
    }
}

/// Install the global subscriber. Hold the returned guard until exit so the
/// file writer gets flushed.
pub fn init_tracing(lvl: LogLevel, log_file: Option<&Path>, json: bool) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::default().add_directive(to_level_filter(lvl).into());
    let console = fmt_layer(json, atty::is(atty::Stream::Stderr), std::io::stderr);

    let (file_layer, guard) = match log_file.map(|p| (p, open_file_writer(p))) {
        Some((_, Some((writer, guard)))) => (Some(fmt_layer(json, false, writer)), Some(guard)),
        Some((path, None)) => {
            out::print_warn(&format!(
                "File logging to '{}' is disabled; logs continue on the console.",
                path.display()
            ));
            if let Ok(def) = default_log_path()
                && def != path
            {
                out::print_info(&format!("The default log path is {}", def.display()));
            }
            (None, None)
        }
        None => (None, None),
    };

    registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()?;
    Ok(guard)
}

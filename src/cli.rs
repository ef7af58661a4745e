//! CLI definition and parsing.
//!
//! Three ways to ask for work:
//! - `SOURCE --dest PATH`: move one file to an explicit destination;
//! - `SOURCE --show NAME --season N --episode N [--title T]`: move one file
//!   into the library under its computed name;
//! - `--batch FILE`: many moves, one per line (see `plan`).
//!
//! `--debug` is a shorthand for `--log-level debug`.

use clap::{Parser, ValueHint};
use std::path::{Path, PathBuf};

use crate::config::types::{Config, LogLevel};
use crate::errors::EpisodeMoverError;

/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Move TV episode files into a Show/Season library, across disks when needed"
)]
pub struct Args {
    /// Episode file to move.
    #[arg(value_name = "SOURCE", value_hint = ValueHint::FilePath, conflicts_with = "batch")]
    pub source: Option<PathBuf>,

    /// Explicit destination file path.
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "show", requires = "source")]
    pub dest: Option<PathBuf>,

    /// Show name; the destination is built under the library base.
    #[arg(long, requires = "source", requires = "season", requires = "episode")]
    pub show: Option<String>,

    #[arg(long, requires = "show")]
    pub season: Option<u32>,

    #[arg(long, requires = "show")]
    pub episode: Option<u32>,

    /// Episode title (optional).
    #[arg(long, requires = "show")]
    pub title: Option<String>,

    /// Tab-separated batch file: `source<TAB>dest` or `source<TAB>show<TAB>season<TAB>episode[<TAB>title]`.
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub batch: Option<PathBuf>,

    /// Files moved in parallel.
    #[arg(long, short = 'w')]
    pub workers: Option<usize>,

    /// Also refresh the mtime of the season and show folders.
    #[arg(long)]
    pub touch_ancestors: bool,

    /// Override the library base directory.
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub library_base: Option<PathBuf>,

    /// Enable debug logging (shorthand for --log-level debug).
    #[arg(short = 'd', long)]
    pub debug: bool,

    /// Set log level: quiet, normal, info, debug.
    #[arg(long, value_parser = parse_log_level)]
    pub log_level: Option<LogLevel>,

    /// Print the config file location and exit.
    #[arg(long)]
    pub print_config: bool,

    /// Emit logs in structured JSON.
    #[arg(long)]
    pub json: bool,
}

/// The work requested on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Single {
        source: PathBuf,
        dest: PathBuf,
    },
    Episode {
        source: PathBuf,
        show: String,
        season: u32,
        episode: u32,
        title: Option<String>,
    },
    Batch(PathBuf),
}

impl Args {
    pub fn request(&self) -> Result<Request, EpisodeMoverError> {
        if let Some(batch) = &self.batch {
            return Ok(Request::Batch(batch.clone()));
        }
        let Some(source) = self.source.as_deref().map(sanitize_path) else {
            return Err(EpisodeMoverError::NoWork);
        };
        if let Some(dest) = &self.dest {
            return Ok(Request::Single {
                source,
                dest: sanitize_path(dest),
            });
        }
        match (&self.show, self.season, self.episode) {
            (Some(show), Some(season), Some(episode)) => Ok(Request::Episode {
                source,
                show: show.clone(),
                season,
                episode,
                title: self.title.clone(),
            }),
            _ => Err(EpisodeMoverError::NoWork),
        }
    }

    /// Precedence: --debug > --log-level value > None (use config).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level
    }

    /// Apply CLI overrides to a loaded Config. Unset flags change nothing.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(base) = &self.library_base {
            cfg.library_base = sanitize_path(base);
        }
        if let Some(w) = self.workers {
            cfg.workers = w;
        }
        if self.touch_ancestors {
            cfg.touch_ancestors = true;
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
    }
}

/// Strip quotes a shell or a media-center hook left around a path, and one
/// trailing separator (never the root itself).
pub fn sanitize_path(p: &Path) -> PathBuf {
    let raw = p.to_string_lossy();
    let trimmed = raw.trim();
    let mut inner = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| trimmed.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
        .unwrap_or_else(|| trimmed.trim_matches(|c| c == '\'' || c == '"'))
        .to_string();
    if inner.len() > 1 && (inner.ends_with('/') || inner.ends_with('\\')) {
        inner.pop();
    }
    PathBuf::from(inner)
}

/// Rejects unknown names the same way the XML config does.
fn parse_log_level(s: &str) -> Result<LogLevel, String> {
    s.parse::<LogLevel>()
        .map_err(|e| format!("{e} (expected quiet, normal, info or debug)"))
}

pub fn parse() -> Args {
    Args::parse()
}

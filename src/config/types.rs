//! Core configuration types.
//! - Config holds runtime settings with sensible defaults.
//! - LogLevel represents verbosity with simple parsing helpers.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::{LIBRARY_BASE_DEFAULT, default_workers, paths};

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    #[default]
    Normal,
    /// Per-file detail
    Info,
    /// Everything, including chunk-level tracing
    Debug,
}

impl LogLevel {
    /// Case-insensitive; accepts a few common aliases.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        })
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Runtime configuration, loaded once per process and passed explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root of the show/season library
    pub library_base: PathBuf,
    /// Size of the relocation worker pool
    pub workers: usize,
    /// Also bump the mtime of the season and show directories after a move
    pub touch_ancestors: bool,
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            library_base: PathBuf::from(LIBRARY_BASE_DEFAULT),
            workers: default_workers(),
            touch_ancestors: false,
            log_level: LogLevel::Normal,
            log_file: paths::default_log_path().ok(),
        }
    }
}

impl Config {
    /// Defaults with an explicit library base.
    pub fn new(library_base: impl Into<PathBuf>) -> Self {
        Self {
            library_base: library_base.into(),
            ..Default::default()
        }
    }
}

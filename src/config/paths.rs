//! Default path helpers and symlink checks.
//!
//! `$EPISODE_MOVER_CONFIG` overrides the config location. It may name a file
//! or a directory (then `config.xml` inside it is used); relative values are
//! taken from the current directory. When it is set, the default log file
//! sits next to that config file.

use anyhow::{Result, anyhow};
use dirs::{config_dir, data_dir};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "EPISODE_MOVER_CONFIG";
const APP_DIR: &str = "episode_mover";
const CONFIG_FILE: &str = "config.xml";
const LOG_FILE: &str = "episode_mover.log";

/// Config path from the environment, if the variable is set and non-empty.
pub fn env_config_path() -> Option<PathBuf> {
    let raw = env::var_os(CONFIG_ENV).filter(|v| !v.is_empty())?;
    let mut p = PathBuf::from(raw);
    if p.is_relative()
        && let Ok(cwd) = env::current_dir()
    {
        p = cwd.join(p);
    }
    let names_dir = p.is_dir() || p.as_os_str().to_string_lossy().ends_with(['/', '\\']);
    if names_dir {
        p.push(CONFIG_FILE);
    }
    Some(p)
}

/// Config path in effect: the environment override or the OS config dir.
pub fn default_config_path() -> Result<PathBuf> {
    if let Some(p) = env_config_path() {
        return Ok(p);
    }
    let base = config_dir()
        .or_else(|| env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok_or_else(|| anyhow!("cannot determine a config directory (no HOME)"))?;
    Ok(base.join(APP_DIR).join(CONFIG_FILE))
}

/// Log path used when the config names none.
pub fn default_log_path() -> Result<PathBuf> {
    if let Some(cfg) = env_config_path() {
        let dir = cfg.parent().map(Path::to_path_buf).unwrap_or_default();
        return Ok(dir.join(LOG_FILE));
    }
    let base = data_dir()
        .or_else(|| env::var_os("HOME").map(|h| PathBuf::from(h).join(".local").join("share")))
        .ok_or_else(|| anyhow!("cannot determine a data directory (no HOME)"))?;
    Ok(base.join(APP_DIR).join(LOG_FILE))
}

/// True if any existing ancestor of `path` is a symlink.
pub fn path_has_symlink_ancestor(path: &Path) -> io::Result<bool> {
    let mut p = path.parent();
    while let Some(anc) = p {
        if anc.as_os_str().is_empty() {
            break;
        }
        match fs::symlink_metadata(anc) {
            Ok(meta) if meta.file_type().is_symlink() => return Ok(true),
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        p = anc.parent();
    }
    Ok(false)
}

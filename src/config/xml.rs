//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - Creates a secure template when the default config is missing.
//!
//! Unknown elements and malformed values are errors, so a typo never silently
//! falls back to a default.

use anyhow::{Context, Result, anyhow, bail};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::paths::{default_config_path, default_log_path, env_config_path, path_has_symlink_ancestor};
use super::types::{Config, LogLevel};
use super::{LIBRARY_BASE_DEFAULT, default_workers};
use crate::fs_ops::io_error_with_help;
use crate::platform::{set_dir_mode_0700, set_file_mode_0600, write_config_secure_new_0600};

#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    library_base: Option<String>,
    workers: Option<String>,
    touch_ancestors: Option<String>,
    log_level: Option<String>,
    log_file: Option<String>,
}

/// What `load_or_init` found.
#[derive(Debug)]
pub enum LoadResult {
    Loaded(Config, PathBuf),
    /// `$EPISODE_MOVER_CONFIG` names a file that does not exist.
    Defaults(PathBuf),
    /// No config at the default location; a template was written there.
    CreatedTemplate(PathBuf),
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config::default();
    if let Some(base) = non_empty(parsed.library_base) {
        cfg.library_base = PathBuf::from(base);
    }
    if let Some(w) = non_empty(parsed.workers) {
        cfg.workers = w
            .parse()
            .map_err(|_| anyhow!("<workers> must be a positive integer, got '{w}'"))?;
    }
    if let Some(t) = non_empty(parsed.touch_ancestors) {
        cfg.touch_ancestors = match t.to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => true,
            "false" | "no" | "0" => false,
            _ => bail!("<touch_ancestors> must be true or false, got '{t}'"),
        };
    }
    if let Some(l) = non_empty(parsed.log_level) {
        cfg.log_level = l.parse::<LogLevel>().map_err(|e| anyhow!("<log_level>: {e}"))?;
    }
    if let Some(f) = non_empty(parsed.log_file) {
        cfg.log_file = Some(PathBuf::from(f));
    }
    Ok(cfg)
}

/// Load a Config from a specific XML file.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path).map_err(io_error_with_help("read config", path))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    xml_to_config(parsed).with_context(|| format!("invalid config '{}'", path.display()))
}

/// Load the config in effect, writing a template first when the default
/// location is empty. A missing file named by the environment means defaults.
pub fn load_or_init() -> Result<LoadResult> {
    let path = default_config_path()?;
    if path.exists() {
        let cfg = load_config_from_xml_path(&path)?;
        return Ok(LoadResult::Loaded(cfg, path));
    }
    if env_config_path().is_some() {
        return Ok(LoadResult::Defaults(path));
    }
    create_template_config(&path)?;
    Ok(LoadResult::CreatedTemplate(path))
}

/// Write a commented template config (0600, parent 0700). Refuses to write
/// through a symlinked ancestor.
pub fn create_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        bail!(
            "Refusing to create config: ancestor of {} is a symlink",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error_with_help("create config dir", parent))?;
        let _ = set_dir_mode_0700(parent);
    }

    let suggested_log = default_log_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "/path/to/episode_mover.log".into());

    let content = format!(
        "<!--\n  episode_mover configuration (XML)\n\n    library_base     -> root of the TV library (<Show>/Season NN/...)\n    workers          -> files moved in parallel (1-64)\n    touch_ancestors  -> true: also refresh season/show folder timestamps\n    log_level        -> quiet | normal | info | debug\n    log_file         -> log file path (optional; console output continues)\n\n  CLI flags override these values.\n-->\n<config>\n  <library_base>{}</library_base>\n  <workers>{}</workers>\n  <touch_ancestors>false</touch_ancestors>\n  <log_level>normal</log_level>\n  <log_file>{}</log_file>\n</config>\n",
        LIBRARY_BASE_DEFAULT,
        default_workers(),
        suggested_log
    );

    write_config_secure_new_0600(path, content.as_bytes())?;
    let _ = set_file_mode_0600(path);
    info!(path = %path.display(), "created template config");
    Ok(())
}

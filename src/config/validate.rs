//! Config validation: library base sanity and worker bounds.

use anyhow::{Context, Result, bail};
use std::fs;
use tracing::{debug, info};

use super::MAX_WORKERS;
use super::types::Config;
use crate::fs_ops::is_writable_probe;

impl Config {
    /// Check worker bounds, then make sure the library base exists (created
    /// when missing), is a directory and accepts new files.
    pub fn validate(&self) -> Result<()> {
        self.validate_workers()?;

        let base = &self.library_base;
        if base.as_os_str().is_empty() {
            bail!("library_base is empty");
        }
        match fs::metadata(base) {
            Ok(meta) if !meta.is_dir() => {
                bail!("library_base exists but isn't a directory: {}", base.display())
            }
            Ok(_) => {}
            Err(_) => {
                fs::create_dir_all(base).with_context(|| {
                    format!("Failed to create library_base directory '{}'", base.display())
                })?;
                info!(dir = %base.display(), "created library base");
            }
        }
        is_writable_probe(base).with_context(|| {
            format!("Cannot write to library_base '{}'; check permissions", base.display())
        })?;
        debug!(dir = %base.display(), workers = self.workers, "config validated");
        Ok(())
    }

    /// Worker bounds only; enough when every destination is explicit.
    pub fn validate_workers(&self) -> Result<()> {
        if self.workers == 0 || self.workers > MAX_WORKERS {
            bail!("workers must be between 1 and {MAX_WORKERS}, got {}", self.workers);
        }
        Ok(())
    }
}

//! Windows implementations of platform helpers.
//!
//! Windows has no POSIX modes; the mode setters are no-ops and no ACLs are
//! touched. Config writes still go through temp + rename.

use anyhow::{Result, bail};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use windows_sys::Win32::Storage::FileSystem::GetLogicalDrives;

use super::temp::tmp_config_sibling_name;

pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Refuses to overwrite an existing config.
pub fn write_config_secure_new_0600(path: &Path, contents: &[u8]) -> Result<()> {
    if path.exists() {
        bail!("Config file already exists: {}", path.display());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_config_sibling_name(path);
    let mut f = OpenOptions::new().write(true).create_new(true).open(&tmp)?;
    f.write_all(contents)?;
    f.sync_all()?;
    drop(f);
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

pub fn set_dir_mode_0700(_path: &Path) -> io::Result<()> {
    Ok(())
}

pub fn set_file_mode_0600(_path: &Path) -> io::Result<()> {
    Ok(())
}

/// Drive letters currently mapped (`C:\`, `D:\`, ...).
pub fn list_filesystem_roots() -> io::Result<Vec<PathBuf>> {
    // SAFETY: no arguments; returns a bitmask or 0 on failure.
    let mask = unsafe { GetLogicalDrives() };
    if mask == 0 {
        return Err(io::Error::last_os_error());
    }
    Ok((0..26u8)
        .filter(|bit| mask & (1 << bit) != 0)
        .map(|bit| PathBuf::from(format!("{}:\\", (b'A' + bit) as char)))
        .collect())
}

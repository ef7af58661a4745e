//! I/O helper utilities.
//!
//! Small adapters that enrich io::Error with the operation, the path and an
//! actionable hint, for use with `map_err` in both io::Result and
//! anyhow::Result code paths.
//!
//! Usage:
//!   fs::create_dir_all(dir).map_err(io_error_with_help("create dir", dir))?;
//!   File::open(p).map_err(io_error_with_help_io("open source", p))?;

use anyhow::anyhow;
use std::io;
use std::path::Path;

/// Hint keyed on the raw OS error code, when the platform gives us one.
#[cfg(unix)]
fn os_hint(code: i32) -> Option<&'static str> {
    let hint = match code {
        libc::EACCES | libc::EPERM => "permission denied; check ownership and write permissions",
        libc::EXDEV => "cross-filesystem; atomic rename not possible",
        libc::EBUSY => "resource busy; another process may be using the file",
        libc::ENOENT => "path not found; verify it exists",
        libc::EEXIST => "already exists",
        libc::ENOSPC => "insufficient space on device",
        libc::EROFS => "read-only filesystem; cannot write here",
        libc::ENOTDIR => "a path component is a file, not a directory",
        libc::EISDIR => "target is a directory",
        libc::ENAMETOOLONG => "filename or path too long; shorten the show or episode title",
        libc::EMFILE | libc::ENFILE => "too many open files; lower the worker count",
        _ => return None,
    };
    Some(hint)
}

#[cfg(windows)]
fn os_hint(code: i32) -> Option<&'static str> {
    let hint = match code {
        5 => "access denied; check permissions",                // ERROR_ACCESS_DENIED
        17 => "not same device; cross-filesystem move",         // ERROR_NOT_SAME_DEVICE
        32 => "sharing violation; file is in use",              // ERROR_SHARING_VIOLATION
        2 | 3 => "path not found; verify it exists",            // FILE / PATH NOT FOUND
        80 | 183 => "already exists",                           // ERROR_FILE_EXISTS / ALREADY_EXISTS
        112 => "insufficient disk space",                       // ERROR_DISK_FULL
        19 => "write protected / read-only media",              // ERROR_WRITE_PROTECT
        206 => "filename or path too long (MAX_PATH exceeded)", // ERROR_FILENAME_EXCED_RANGE
        _ => return None,
    };
    Some(hint)
}

#[cfg(not(any(unix, windows)))]
fn os_hint(_code: i32) -> Option<&'static str> {
    None
}

fn kind_hint(kind: io::ErrorKind) -> Option<&'static str> {
    match kind {
        io::ErrorKind::PermissionDenied => Some("permission denied; check ownership and write permissions"),
        io::ErrorKind::NotFound => Some("path not found; verify it exists"),
        io::ErrorKind::AlreadyExists => Some("already exists"),
        io::ErrorKind::StorageFull => Some("insufficient space on device"),
        io::ErrorKind::ReadOnlyFilesystem => Some("read-only filesystem; cannot write here"),
        io::ErrorKind::CrossesDevices => Some("cross-filesystem; atomic rename not possible"),
        _ => None,
    }
}

/// Format "<op> '<path>': <error> (<hint>) [os code: N]".
pub(crate) fn describe_io_error(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);
    let hint = match e.raw_os_error() {
        Some(code) => os_hint(code).or_else(|| kind_hint(e.kind())),
        None => kind_hint(e.kind()),
    };
    if let Some(h) = hint {
        msg.push_str(" (");
        msg.push_str(h);
        msg.push(')');
    }
    if let Some(code) = e.raw_os_error() {
        msg.push_str(&format!(" [os code: {code}]"));
    }
    msg
}

/// Adapter for anyhow::Result code.
pub fn io_error_with_help<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> anyhow::Error + 'a {
    move |e: io::Error| anyhow!(describe_io_error(op, path, &e))
}

/// Adapter for io::Result code; keeps the original ErrorKind.
pub fn io_error_with_help_io<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> io::Error + 'a {
    move |e: io::Error| io::Error::new(e.kind(), describe_io_error(op, path, &e))
}

//! macOS mount point enumeration through `getmntinfo(3)`.

use std::ffi::{CStr, OsStr};
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::PathBuf;

pub fn list_filesystem_roots() -> io::Result<Vec<PathBuf>> {
    let mut buf: *mut libc::statfs = std::ptr::null_mut();
    // SAFETY: getmntinfo fills `buf` with a pointer to `count` statfs records
    // owned by libc; we only read them before returning.
    let count = unsafe { libc::getmntinfo(&mut buf, libc::MNT_NOWAIT) };
    if count <= 0 || buf.is_null() {
        return Err(io::Error::last_os_error());
    }
    // SAFETY: see above; `count` records are valid.
    let entries = unsafe { std::slice::from_raw_parts(buf, count as usize) };
    let mut roots = Vec::with_capacity(entries.len());
    for entry in entries {
        // SAFETY: f_mntonname is a NUL-terminated fixed-size buffer.
        let name = unsafe { CStr::from_ptr(entry.f_mntonname.as_ptr()) };
        roots.push(PathBuf::from(OsStr::from_bytes(name.to_bytes())));
    }
    Ok(roots)
}

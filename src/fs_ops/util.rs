use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static PROBE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Quick writable probe: create and remove a small file in `dir`.
/// Names carry pid + a process-wide sequence so concurrent workers probing
/// the same season directory never collide.
pub(crate) fn is_writable_probe(dir: &Path) -> io::Result<()> {
    let seq = PROBE_SEQ.fetch_add(1, Ordering::Relaxed);
    let probe = dir.join(format!(".episode_mover_probe_{}_{}.tmp", std::process::id(), seq));
    fs::OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(&probe)?;
    let _ = fs::remove_file(&probe);
    Ok(())
}

pub(super) fn is_cross_device(e: &io::Error) -> bool {
    if e.kind() == io::ErrorKind::CrossesDevices {
        return true;
    }
    match e.raw_os_error() {
        #[cfg(unix)]
        Some(code) => code == libc::EXDEV,
        // ERROR_NOT_SAME_DEVICE
        #[cfg(windows)]
        Some(code) => code == 17,
        _ => false,
    }
}

/// True when both paths reach the same file: hard links of one inode, or one
/// entry seen through a symlinked directory.
pub(super) fn is_same_file(a: &Path, b: &Path) -> io::Result<bool> {
    Ok(file_identity(a)? == file_identity(b)?)
}

#[cfg(unix)]
fn file_identity(p: &Path) -> io::Result<(u64, u64)> {
    use std::os::unix::fs::MetadataExt;
    let meta = fs::metadata(p)?;
    Ok((meta.dev(), meta.ino()))
}

#[cfg(windows)]
fn file_identity(p: &Path) -> io::Result<(u64, u64)> {
    use std::os::windows::io::AsRawHandle;
    use windows_sys::Win32::Storage::FileSystem::{
        BY_HANDLE_FILE_INFORMATION, GetFileInformationByHandle,
    };

    let f = File::open(p)?;
    // SAFETY: plain-data out struct; all-zero is a valid value.
    let mut info: BY_HANDLE_FILE_INFORMATION = unsafe { std::mem::zeroed() };
    // SAFETY: the handle stays valid while `f` is alive.
    let ok = unsafe { GetFileInformationByHandle(f.as_raw_handle() as _, &mut info) };
    if ok == 0 {
        return Err(io::Error::last_os_error());
    }
    let index = (u64::from(info.nFileIndexHigh) << 32) | u64::from(info.nFileIndexLow);
    Ok((u64::from(info.dwVolumeSerialNumber), index))
}

#[cfg(not(any(unix, windows)))]
fn file_identity(_p: &Path) -> io::Result<(u64, u64)> {
    Err(io::Error::new(io::ErrorKind::Unsupported, "no file identity on this platform"))
}

/// `p` with its parent directory canonicalized but the final component kept,
/// so a symlink at `p` itself is not followed.
pub(super) fn entry_path(p: &Path) -> io::Result<PathBuf> {
    let parent = p
        .parent()
        .filter(|d| !d.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = p
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
    Ok(fs::canonicalize(parent)?.join(name))
}

#[cfg(unix)]
pub(super) fn fsync_dir(dir: &Path) -> io::Result<()> {
    let f = File::open(dir)?;
    f.sync_all()
}

#[cfg(not(unix))]
pub(super) fn fsync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

//! Platform-specific helpers.
//! Hides OS differences (Unix/macOS/Windows) behind one API: secure log and
//! config files, POSIX modes, and filesystem root enumeration.

mod temp;

#[cfg(unix)]
mod common_unix;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(all(unix, not(target_os = "macos")))]
mod unix;
#[cfg(windows)]
mod windows;

#[cfg(unix)]
pub use common_unix::{
    open_log_file_secure_append, set_dir_mode_0700, set_file_mode_0600,
    write_config_secure_new_0600,
};
#[cfg(target_os = "macos")]
pub use macos::list_filesystem_roots;
#[cfg(all(unix, not(target_os = "macos")))]
pub use unix::list_filesystem_roots;

#[cfg(windows)]
pub use windows::{
    list_filesystem_roots, open_log_file_secure_append, set_dir_mode_0700, set_file_mode_0600,
    write_config_secure_new_0600,
};

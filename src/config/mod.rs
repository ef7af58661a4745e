//! Configuration: types, default paths, XML loading and validation.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{CONFIG_ENV, default_config_path, default_log_path, path_has_symlink_ancestor};
pub use types::{Config, LogLevel};
pub use xml::{LoadResult, create_template_config, load_config_from_xml_path, load_or_init};

/// Library root used when no config file says otherwise.
pub const LIBRARY_BASE_DEFAULT: &str = "/mnt/World/TV";
/// Upper bound on the worker pool.
pub const MAX_WORKERS: usize = 64;

/// Available parallelism, capped at 4: moves are I/O bound and a spinning
/// disk does not get faster with more concurrent streams.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(4)
}

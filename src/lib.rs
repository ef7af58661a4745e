//! Core library for `episode_mover`.
//!
//! Moves TV episode files into a `<Show>/Season NN/` library. The pieces:
//! - `fs_ops`: the relocation engine (rename on the same disk, chunked copy
//!   plus delete across disks) and its notifier contract;
//! - `orchestrator`: runs many relocations on a bounded worker pool;
//! - `metadata` and `naming`: show/season/title lookup and destination names;
//! - `config`, `cli`, `output`, `platform`: the ambient plumbing for the binary.

pub mod cancel;
pub mod cli;
pub mod config;
pub mod errors;
pub mod fs_ops;
pub mod metadata;
pub mod naming;
pub mod orchestrator;
pub mod output;
pub mod plan;
pub mod platform;

pub use cancel::CancelToken;
pub use config::{
    Config, LIBRARY_BASE_DEFAULT, LogLevel, MAX_WORKERS, default_config_path, default_log_path,
    path_has_symlink_ancestor,
};
pub use errors::{EpisodeMoverError, RelocateError};
pub use fs_ops::{
    COPY_CHUNK_SIZE, Episode, FixedRoots, MoveMethod, MoveNotifier, MoveState, NoopNotifier,
    RelocateOptions, Relocation, Relocator, RootProvider, SystemRoots,
};
pub use metadata::{Season, Show, ShowRegistry};
pub use orchestrator::{BatchSummary, EpisodeJob, JobOutcome, MoveJob, Orchestrator};

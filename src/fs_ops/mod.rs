//! Filesystem operations: the relocation engine and its building blocks.

mod atomic;
mod copy;
mod episode;
mod helpers;
mod meta;
mod notifier;
mod relocate;
mod roots;
mod util;

pub use copy::COPY_CHUNK_SIZE;
pub use episode::{Episode, MoveState};
pub use helpers::{io_error_with_help, io_error_with_help_io};
pub use notifier::{MoveNotifier, NoopNotifier};
pub use relocate::{MoveMethod, RelocateOptions, Relocation, Relocator};
pub use roots::{FixedRoots, RootProvider, SystemRoots, is_same_disk};

pub(crate) use roots::absolutize;
pub(crate) use util::is_writable_probe;

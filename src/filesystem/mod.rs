//! Filesystem access used by the explorer.
//!
//! Everything above this module talks to the disk through the [`FileSystem`]
//! trait, so the tree and the commands can be driven by an in-memory stub in
//! tests and by [`LocalFileSystem`] in the binary.

mod capability;
mod local;

pub use capability::{DeleteOptions, EntryKind, FileSystem, FsError};
pub use local::{LocalFileSystem, LocalFileSystemError};

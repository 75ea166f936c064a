use std::path::{Path, PathBuf};

use derive_more::Display;
use snafu::Snafu;

/// What a path points at, as far as the explorer cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum EntryKind {
    #[display("file")]
    File,
    #[display("directory")]
    Directory,
}

impl EntryKind {
    pub fn is_directory(self) -> bool {
        matches!(self, EntryKind::Directory)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOptions {
    pub recursive: bool,
    /// Send the entry to a recoverable store instead of removing it.
    pub use_recoverable_trash: bool,
}

impl Default for DeleteOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            use_recoverable_trash: true,
        }
    }
}

/// Asynchronous access to the filesystem backing an explorer tree.
///
/// Every call is attempted exactly once; implementations must not retry.
/// Paths passed in and returned are absolute.
pub trait FileSystem {
    async fn classify(&self, path: &Path) -> Result<EntryKind, FsError>;

    /// Lists the direct entries of a directory as absolute paths, in the
    /// order the underlying store reports them.
    async fn list_entries(&self, path: &Path) -> Result<Vec<PathBuf>, FsError>;

    /// Moves `from` to `to`. Fails when `to` already exists; nothing is
    /// ever overwritten.
    async fn rename(&self, from: &Path, to: &Path) -> Result<(), FsError>;

    async fn delete(&self, path: &Path, options: DeleteOptions) -> Result<(), FsError>;

    /// Creates a new empty file. Fails when `path` already exists.
    async fn write_empty_file(&self, path: &Path) -> Result<(), FsError>;

    async fn create_directory(&self, path: &Path) -> Result<(), FsError>;

    async fn exists(&self, path: &Path) -> bool;
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum FsError {
    #[snafu(display("Failed to stat '{}'", path.display()))]
    StatError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to read directory '{}'", path.display()))]
    ListError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to move '{}' to '{}'", from.display(), to.display()))]
    RenameError {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to delete '{}'", path.display()))]
    DeleteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to move '{}' to the trash", path.display()))]
    TrashError {
        path: PathBuf,
        source: trash::Error,
    },
    #[snafu(display("Failed to create file '{}'", path.display()))]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to create directory '{}'", path.display()))]
    CreateDirError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to hand '{}' to the filesystem worker: {}", path.display(), error))]
    DispatchError { path: PathBuf, error: String },
    #[snafu(display("Filesystem worker dropped the request for '{}'", path.display()))]
    WorkerCanceledError {
        path: PathBuf,
        source: futures_channel::oneshot::Canceled,
    },
}

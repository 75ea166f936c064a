use std::io::{Error, ErrorKind};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use compio::dispatcher::{Dispatcher, DispatcherBuilder};
use compio::fs;
use snafu::{ResultExt, Snafu};
use tracing::debug;

use super::capability::{
    CreateDirSnafu, DeleteSnafu, DispatchSnafu, ListSnafu, RenameSnafu, StatSnafu, TrashSnafu,
    WorkerCanceledSnafu, WriteSnafu,
};
use super::{DeleteOptions, EntryKind, FileSystem, FsError};
use crate::ext::PathExt;

/// Threads reserved for the std calls compio has no async counterpart for.
const BLOCKING_WORKER_THREADS: NonZeroUsize = NonZeroUsize::MIN;

/// [`FileSystem`] backed by the local disk.
///
/// Recoverable deletes go to the platform trash, or into `trash_dir` when
/// one is configured.
pub struct LocalFileSystem {
    dispatcher: Dispatcher,
    trash_dir: Option<PathBuf>,
}

impl LocalFileSystem {
    pub fn new(trash_dir: Option<PathBuf>) -> Result<Self, LocalFileSystemError> {
        let dispatcher = DispatcherBuilder::new()
            .worker_threads(BLOCKING_WORKER_THREADS)
            .build()
            .context(DispatcherSnafu)?;

        Ok(Self {
            dispatcher,
            trash_dir,
        })
    }

    /// Runs a blocking job on the dispatcher and waits for its result.
    async fn run_blocking<T, F>(&self, path: &Path, job: F) -> Result<T, FsError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let receiver = self
            .dispatcher
            .dispatch(move || async move { job() })
            .map_err(|e| {
                DispatchSnafu {
                    path,
                    error: e.to_string(),
                }
                .build()
            })?;

        receiver.await.context(WorkerCanceledSnafu { path })
    }

    /// Renames `path` into `trash_dir` under a name no earlier trashed entry
    /// holds. Falls back to the platform trash when the trash directory is on
    /// another device.
    async fn move_to_trash_dir(&self, path: &Path, trash_dir: &Path) -> Result<(), FsError> {
        fs::create_dir_all(trash_dir)
            .await
            .context(CreateDirSnafu { path: trash_dir })?;

        let destination = self.free_trash_slot(trash_dir, &path.label()).await;
        debug!(
            "Moving '{}' to trash as '{}'",
            path.display(),
            destination.display()
        );

        match self.rename(path, &destination).await {
            Err(FsError::RenameError { source, .. })
                if source.kind() == ErrorKind::CrossesDevices =>
            {
                debug!(
                    "'{}' is on another device than '{}', using the platform trash",
                    path.display(),
                    trash_dir.display()
                );
                self.move_to_platform_trash(path).await
            }
            result => result,
        }
    }

    async fn free_trash_slot(&self, trash_dir: &Path, label: &str) -> PathBuf {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();

        let mut destination = trash_dir.join(format!("{label}.{stamp}"));
        let mut attempt = 1;
        while self.is_occupied(&destination).await {
            destination = trash_dir.join(format!("{label}.{stamp}.{attempt}"));
            attempt += 1;
        }
        destination
    }

    async fn move_to_platform_trash(&self, path: &Path) -> Result<(), FsError> {
        debug!("Moving '{}' to the platform trash", path.display());
        let target = path.to_path_buf();
        self.run_blocking(path, move || trash::delete(target))
            .await?
            .context(TrashSnafu { path })
    }

    /// Like [`FileSystem::exists`], but a dangling symlink counts as present.
    async fn is_occupied(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).await.is_ok()
    }

    async fn remove_permanently(&self, path: &Path, recursive: bool) -> Result<(), FsError> {
        match self.classify(path).await? {
            EntryKind::File => fs::remove_file(path).await.context(DeleteSnafu { path }),
            EntryKind::Directory if recursive => {
                let target = path.to_path_buf();
                self.run_blocking(path, move || std::fs::remove_dir_all(target))
                    .await?
                    .context(DeleteSnafu { path })
            }
            EntryKind::Directory => fs::remove_dir(path).await.context(DeleteSnafu { path }),
        }
    }
}

impl FileSystem for LocalFileSystem {
    async fn classify(&self, path: &Path) -> Result<EntryKind, FsError> {
        let metadata = fs::metadata(path).await.context(StatSnafu { path })?;
        if metadata.is_dir() {
            Ok(EntryKind::Directory)
        } else {
            Ok(EntryKind::File)
        }
    }

    async fn list_entries(&self, path: &Path) -> Result<Vec<PathBuf>, FsError> {
        let dir = path.to_path_buf();
        let listing = self
            .run_blocking(path, move || -> std::io::Result<Vec<PathBuf>> {
                std::fs::read_dir(&dir)?
                    .map(|entry| entry.map(|e| e.path()))
                    .collect()
            })
            .await?;

        listing.context(ListSnafu { path })
    }

    async fn rename(&self, from: &Path, to: &Path) -> Result<(), FsError> {
        if self.is_occupied(to).await {
            return Err(Error::from(ErrorKind::AlreadyExists)).context(RenameSnafu { from, to });
        }

        fs::rename(from, to)
            .await
            .context(RenameSnafu { from, to })
    }

    async fn delete(&self, path: &Path, options: DeleteOptions) -> Result<(), FsError> {
        if !options.use_recoverable_trash {
            debug!("Removing '{}' permanently", path.display());
            return self.remove_permanently(path, options.recursive).await;
        }

        match &self.trash_dir {
            Some(trash_dir) => self.move_to_trash_dir(path, trash_dir).await,
            None => self.move_to_platform_trash(path).await,
        }
    }

    async fn write_empty_file(&self, path: &Path) -> Result<(), FsError> {
        let file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await
            .context(WriteSnafu { path })?;
        file.close().await.context(WriteSnafu { path })
    }

    async fn create_directory(&self, path: &Path) -> Result<(), FsError> {
        fs::create_dir(path).await.context(CreateDirSnafu { path })
    }

    async fn exists(&self, path: &Path) -> bool {
        fs::metadata(path).await.is_ok()
    }
}

#[derive(Debug, Snafu)]
pub enum LocalFileSystemError {
    #[snafu(display("Failed to create filesystem worker"))]
    DispatcherError { source: std::io::Error },
}

use std::path::{Path, PathBuf};
use std::rc::Rc;

use snafu::{ResultExt, Snafu};
use tracing::{debug, info};

use crate::ext::PathExt;
use crate::filesystem::{DeleteOptions, EntryKind, FileSystem, FsError};
use crate::host::Host;
use crate::tree::{TreeNode, TreeProvider};

/// How a command that did not fail ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The filesystem was changed and the tree refreshed.
    Completed { path: PathBuf },
    /// No usable input was given; nothing happened.
    Cancelled,
    /// The entry to create is already there; reported to the host.
    AlreadyExists { path: PathBuf },
    /// The place to create an entry in is not a directory; reported to the host.
    NotADirectory { path: PathBuf },
}

/// Rename, delete and create commands.
///
/// Each command performs at most one filesystem mutation and refreshes the
/// whole tree after it succeeds. Refusals and cancellations leave both the
/// disk and the tree alone.
pub struct MutationCommands<F> {
    fs: Rc<F>,
    provider: Rc<TreeProvider<F>>,
    host: Rc<dyn Host>,
}

impl<F: FileSystem> MutationCommands<F> {
    pub fn new(fs: Rc<F>, provider: Rc<TreeProvider<F>>, host: Rc<dyn Host>) -> Self {
        Self { fs, provider, host }
    }

    /// Renames `node` in place, keeping its directory.
    pub async fn rename(
        &self,
        node: &TreeNode,
        new_name: &str,
    ) -> Result<CommandOutcome, CommandError> {
        let Some(new_name) = non_empty(new_name) else {
            return Ok(CommandOutcome::Cancelled);
        };

        let target = node.path().sibling(new_name);
        self.fs
            .rename(node.path(), &target)
            .await
            .context(RenameSnafu { path: node.path() })?;
        info!(
            "Renamed '{}' to '{}'",
            node.path().display(),
            target.display()
        );

        self.provider.refresh();
        Ok(CommandOutcome::Completed { path: target })
    }

    pub async fn delete(&self, node: &TreeNode) -> Result<CommandOutcome, CommandError> {
        self.fs
            .delete(node.path(), DeleteOptions::default())
            .await
            .context(DeleteSnafu { path: node.path() })?;
        info!("Deleted '{}'", node.path().display());

        self.provider.refresh();
        Ok(CommandOutcome::Completed {
            path: node.path().to_path_buf(),
        })
    }

    /// Creates an empty file next to the selection (or in the root) and asks
    /// the host to open it.
    pub async fn new_file(
        &self,
        selection: &[Rc<TreeNode>],
        root: &Path,
        file_name: &str,
    ) -> Result<CommandOutcome, CommandError> {
        let Some(file_name) = non_empty(file_name) else {
            return Ok(CommandOutcome::Cancelled);
        };
        let path = match self.prepare_creation(selection, root, file_name, "File").await {
            Ok(path) => path,
            Err(outcome) => return Ok(outcome),
        };

        self.fs
            .write_empty_file(&path)
            .await
            .context(CreateFileSnafu { path: &path })?;
        info!("Created file '{}'", path.display());

        self.provider.refresh();
        self.host.open_document(&path);
        Ok(CommandOutcome::Completed { path })
    }

    pub async fn new_directory(
        &self,
        selection: &[Rc<TreeNode>],
        root: &Path,
        directory_name: &str,
    ) -> Result<CommandOutcome, CommandError> {
        let Some(directory_name) = non_empty(directory_name) else {
            return Ok(CommandOutcome::Cancelled);
        };
        let path = match self
            .prepare_creation(selection, root, directory_name, "Directory")
            .await
        {
            Ok(path) => path,
            Err(outcome) => return Ok(outcome),
        };

        self.fs
            .create_directory(&path)
            .await
            .context(CreateDirectorySnafu { path: &path })?;
        info!("Created directory '{}'", path.display());

        self.provider.refresh();
        Ok(CommandOutcome::Completed { path })
    }

    /// Resolves where a new entry goes and checks that nothing is there yet.
    /// Refusals are reported to the host and come back as the outcome to return.
    async fn prepare_creation(
        &self,
        selection: &[Rc<TreeNode>],
        root: &Path,
        name: &str,
        what: &str,
    ) -> Result<PathBuf, CommandOutcome> {
        let directory = self.resolve_target_directory(selection, root).await?;
        let path = directory.join(name);

        if self.fs.exists(&path).await {
            self.host
                .show_error(&format!("{} '{}' already exists.", what, name));
            return Err(CommandOutcome::AlreadyExists { path });
        }

        Ok(path)
    }

    /// The first selected node if it is a directory, the directory holding it
    /// if it is a file, and the root when nothing is selected.
    async fn resolve_target_directory(
        &self,
        selection: &[Rc<TreeNode>],
        root: &Path,
    ) -> Result<PathBuf, CommandOutcome> {
        let candidate = match selection.first() {
            Some(node) if node.is_directory() => return Ok(node.path().to_path_buf()),
            Some(node) => node.path().parent().map(Path::to_path_buf),
            None => match self.fs.classify(root).await {
                Ok(EntryKind::Directory) => return Ok(root.to_path_buf()),
                Ok(EntryKind::File) => None,
                Err(e) => {
                    debug!("Cannot classify root: {}", e);
                    None
                }
            },
        };

        match candidate {
            Some(directory) => Ok(directory),
            None => {
                let path = selection
                    .first()
                    .map(|node| node.path().to_path_buf())
                    .unwrap_or_else(|| root.to_path_buf());
                self.host
                    .show_error(&format!("'{}' is not a directory.", path.display()));
                Err(CommandOutcome::NotADirectory { path })
            }
        }
    }
}

/// Whitespace-only input counts as no input. Anything else is used verbatim.
fn non_empty(name: &str) -> Option<&str> {
    if name.trim().is_empty() { None } else { Some(name) }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CommandError {
    #[snafu(display("Could not rename '{}'", path.display()))]
    RenameError { path: PathBuf, source: FsError },
    #[snafu(display("Could not delete '{}'", path.display()))]
    DeleteError { path: PathBuf, source: FsError },
    #[snafu(display("Could not create file '{}'", path.display()))]
    CreateFileError { path: PathBuf, source: FsError },
    #[snafu(display("Could not create directory '{}'", path.display()))]
    CreateDirectoryError { path: PathBuf, source: FsError },
    #[snafu(display("Could not move '{}' into '{}'", path.display(), target.display()))]
    MoveError {
        path: PathBuf,
        target: PathBuf,
        source: FsError,
    },
}

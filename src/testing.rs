//! In-memory collaborators for unit tests.

use std::cell::RefCell;
use std::collections::HashSet;
use std::io::{Error, ErrorKind};
use std::path::{Path, PathBuf};

use crate::filesystem::{DeleteOptions, EntryKind, FileSystem, FsError};
use crate::host::Host;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsCall {
    Classify(PathBuf),
    List(PathBuf),
    Rename { from: PathBuf, to: PathBuf },
    Delete(PathBuf, DeleteOptions),
    WriteEmptyFile(PathBuf),
    CreateDirectory(PathBuf),
    Exists(PathBuf),
}

impl FsCall {
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            FsCall::Rename { .. }
                | FsCall::Delete(..)
                | FsCall::WriteEmptyFile(_)
                | FsCall::CreateDirectory(_)
        )
    }
}

/// A filesystem held in memory. Entries keep insertion order, which is also
/// the order listings report them in. Every call is recorded.
#[derive(Default)]
pub struct StubFileSystem {
    entries: RefCell<Vec<(PathBuf, EntryKind)>>,
    failing_lists: HashSet<PathBuf>,
    failing_classifications: HashSet<PathBuf>,
    failing_renames: HashSet<PathBuf>,
    calls: RefCell<Vec<FsCall>>,
}

impl StubFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dir(self, path: &str) -> Self {
        self.insert(path, EntryKind::Directory);
        self
    }

    pub fn with_file(self, path: &str) -> Self {
        self.insert(path, EntryKind::File);
        self
    }

    pub fn failing_list(mut self, path: &str) -> Self {
        self.failing_lists.insert(PathBuf::from(path));
        self
    }

    pub fn failing_classify(mut self, path: &str) -> Self {
        self.failing_classifications.insert(PathBuf::from(path));
        self
    }

    /// Renames with this source path fail with permission denied.
    pub fn failing_rename(mut self, path: &str) -> Self {
        self.failing_renames.insert(PathBuf::from(path));
        self
    }

    pub fn insert_file(&self, path: &str) {
        self.insert(path, EntryKind::File);
    }

    fn insert(&self, path: &str, kind: EntryKind) {
        self.entries.borrow_mut().push((PathBuf::from(path), kind));
    }

    pub fn kind_of(&self, path: impl AsRef<Path>) -> Option<EntryKind> {
        self.entries
            .borrow()
            .iter()
            .find(|(entry, _)| entry == path.as_ref())
            .map(|(_, kind)| *kind)
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.kind_of(path).is_some()
    }

    pub fn calls(&self) -> Vec<FsCall> {
        self.calls.borrow().clone()
    }

    pub fn mutations(&self) -> Vec<FsCall> {
        self.calls().into_iter().filter(FsCall::is_mutation).collect()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: FsCall) {
        self.calls.borrow_mut().push(call);
    }

    fn parent_is_directory(&self, path: &Path) -> bool {
        path.parent()
            .map(|parent| self.kind_of(parent) == Some(EntryKind::Directory))
            .unwrap_or(false)
    }
}

impl FileSystem for StubFileSystem {
    async fn classify(&self, path: &Path) -> Result<EntryKind, FsError> {
        self.record(FsCall::Classify(path.to_path_buf()));
        match self.kind_of(path) {
            Some(kind) if !self.failing_classifications.contains(path) => Ok(kind),
            _ => Err(FsError::StatError {
                path: path.to_path_buf(),
                source: Error::new(ErrorKind::NotFound, "no such entry"),
            }),
        }
    }

    async fn list_entries(&self, path: &Path) -> Result<Vec<PathBuf>, FsError> {
        self.record(FsCall::List(path.to_path_buf()));
        if self.failing_lists.contains(path) {
            return Err(FsError::ListError {
                path: path.to_path_buf(),
                source: Error::new(ErrorKind::PermissionDenied, "permission denied"),
            });
        }
        if self.kind_of(path) != Some(EntryKind::Directory) {
            return Err(FsError::ListError {
                path: path.to_path_buf(),
                source: Error::new(ErrorKind::NotFound, "not a directory"),
            });
        }

        Ok(self
            .entries
            .borrow()
            .iter()
            .filter(|(entry, _)| entry.parent() == Some(path))
            .map(|(entry, _)| entry.clone())
            .collect())
    }

    async fn rename(&self, from: &Path, to: &Path) -> Result<(), FsError> {
        self.record(FsCall::Rename {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        });
        let failure = if self.failing_renames.contains(from) {
            Some(ErrorKind::PermissionDenied)
        } else if !self.contains(from) || !self.parent_is_directory(to) {
            Some(ErrorKind::NotFound)
        } else if self.contains(to) {
            Some(ErrorKind::AlreadyExists)
        } else {
            None
        };
        if let Some(kind) = failure {
            return Err(FsError::RenameError {
                from: from.to_path_buf(),
                to: to.to_path_buf(),
                source: Error::new(kind, "rename failed"),
            });
        }

        for (entry, _) in self.entries.borrow_mut().iter_mut() {
            if let Ok(rest) = entry.strip_prefix(from) {
                *entry = if rest.as_os_str().is_empty() {
                    to.to_path_buf()
                } else {
                    to.join(rest)
                };
            }
        }
        Ok(())
    }

    async fn delete(&self, path: &Path, options: DeleteOptions) -> Result<(), FsError> {
        self.record(FsCall::Delete(path.to_path_buf(), options));
        if !self.contains(path) {
            return Err(FsError::DeleteError {
                path: path.to_path_buf(),
                source: Error::new(ErrorKind::NotFound, "no such entry"),
            });
        }

        self.entries
            .borrow_mut()
            .retain(|(entry, _)| !entry.starts_with(path));
        Ok(())
    }

    async fn write_empty_file(&self, path: &Path) -> Result<(), FsError> {
        self.record(FsCall::WriteEmptyFile(path.to_path_buf()));
        let failure = if self.contains(path) {
            Some(ErrorKind::AlreadyExists)
        } else if !self.parent_is_directory(path) {
            Some(ErrorKind::NotFound)
        } else {
            None
        };
        if let Some(kind) = failure {
            return Err(FsError::WriteError {
                path: path.to_path_buf(),
                source: Error::new(kind, "create failed"),
            });
        }

        self.entries
            .borrow_mut()
            .push((path.to_path_buf(), EntryKind::File));
        Ok(())
    }

    async fn create_directory(&self, path: &Path) -> Result<(), FsError> {
        self.record(FsCall::CreateDirectory(path.to_path_buf()));
        let failure = if self.contains(path) {
            Some(ErrorKind::AlreadyExists)
        } else if !self.parent_is_directory(path) {
            Some(ErrorKind::NotFound)
        } else {
            None
        };
        if let Some(kind) = failure {
            return Err(FsError::CreateDirError {
                path: path.to_path_buf(),
                source: Error::new(kind, "mkdir failed"),
            });
        }

        self.entries
            .borrow_mut()
            .push((path.to_path_buf(), EntryKind::Directory));
        Ok(())
    }

    async fn exists(&self, path: &Path) -> bool {
        self.record(FsCall::Exists(path.to_path_buf()));
        self.contains(path)
    }
}

/// A [`Host`] that remembers everything it was asked to show or open.
#[derive(Default)]
pub struct RecordingHost {
    warnings: RefCell<Vec<String>>,
    errors: RefCell<Vec<String>>,
    opened: RefCell<Vec<PathBuf>>,
}

impl RecordingHost {
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.borrow().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.borrow().clone()
    }

    pub fn opened(&self) -> Vec<PathBuf> {
        self.opened.borrow().clone()
    }
}

impl Host for RecordingHost {
    fn show_warning(&self, message: &str) {
        self.warnings.borrow_mut().push(message.to_string());
    }

    fn show_error(&self, message: &str) {
        self.errors.borrow_mut().push(message.to_string());
    }

    fn open_document(&self, path: &Path) {
        self.opened.borrow_mut().push(path.to_path_buf());
    }
}

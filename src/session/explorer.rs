use std::path::{Path, PathBuf};
use std::rc::Rc;

use snafu::{ResultExt, Snafu};
use tracing::debug;

use super::{ExplorerSession, SessionState, SessionStateError};
use crate::filesystem::{FileSystem, FsError};
use crate::host::Host;
use crate::tree::ListingOptions;

/// Owns the current [`ExplorerSession`] and the persisted last root.
pub struct Explorer<F> {
    fs: Rc<F>,
    host: Rc<dyn Host>,
    options: ListingOptions,
    state_file: PathBuf,
    state: SessionState,
    session: Option<ExplorerSession<F>>,
}

impl<F: FileSystem> Explorer<F> {
    pub async fn new(
        fs: Rc<F>,
        host: Rc<dyn Host>,
        options: ListingOptions,
        state_file: PathBuf,
    ) -> Self {
        let state = SessionState::read(&state_file).await;
        Self {
            fs,
            host,
            options,
            state_file,
            state,
            session: None,
        }
    }

    /// Opens `root`, replacing any open session, and remembers it for next time.
    /// A root that cannot be found is neither opened nor remembered.
    pub async fn open_note(
        &mut self,
        root: &Path,
    ) -> Result<&ExplorerSession<F>, ExplorerError> {
        self.fs.classify(root).await.context(RootSnafu { path: root })?;
        self.state.remember_root(root);
        self.state.write(&self.state_file).await.context(StateSnafu)?;
        Ok(self.start(root.to_path_buf()))
    }

    /// Reopens the root remembered from a previous run, if there is one.
    pub async fn restore(&mut self) -> Result<Option<&ExplorerSession<F>>, ExplorerError> {
        let Some(root) = self.state.last_root() else {
            return Ok(None);
        };
        debug!("Restoring last opened root '{}'", root.display());
        self.fs.classify(&root).await.context(RootSnafu { path: &root })?;
        Ok(Some(self.start(root)))
    }

    pub fn close(&mut self) {
        if let Some(session) = self.session.take() {
            session.close();
        }
    }

    fn start(&mut self, root: PathBuf) -> &ExplorerSession<F> {
        self.close();
        self.session.insert(ExplorerSession::open(
            root,
            self.fs.clone(),
            self.host.clone(),
            self.options.clone(),
        ))
    }
}

#[derive(Debug, Snafu)]
pub enum ExplorerError {
    #[snafu(display("Cannot open '{}' as the explorer root", path.display()))]
    RootError { path: PathBuf, source: FsError },
    #[snafu(display("Failed to remember the opened root"))]
    StateError { source: SessionStateError },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingHost, StubFileSystem};
    use tempfile::TempDir;

    async fn explorer(state_file: PathBuf) -> Explorer<StubFileSystem> {
        Explorer::new(
            Rc::new(StubFileSystem::new().with_dir("/notes").with_dir("/work")),
            Rc::new(RecordingHost::default()),
            ListingOptions::default(),
            state_file,
        )
        .await
    }

    #[compio::test]
    async fn nothing_to_restore_on_first_run() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let mut explorer = explorer(temp_dir.path().join("state.bincode")).await;

        assert!(explorer.restore().await.unwrap().is_none());
    }

    #[compio::test]
    async fn opened_root_is_restored_by_the_next_explorer() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let state_file = temp_dir.path().join("state.bincode");

        let mut first = explorer(state_file.clone()).await;
        first.open_note(Path::new("/notes")).await.unwrap();
        let opened = first.open_note(Path::new("/work")).await.unwrap();
        assert_eq!(opened.root(), Path::new("/work"));

        let mut second = explorer(state_file).await;
        let restored = second.restore().await.unwrap().unwrap();
        assert_eq!(restored.root(), Path::new("/work"));
        assert_eq!(restored.title(), "WORK");
    }

    #[compio::test]
    async fn closing_keeps_the_remembered_root() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let mut explorer = explorer(temp_dir.path().join("state.bincode")).await;

        explorer.open_note(Path::new("/notes")).await.unwrap();
        explorer.close();

        let restored = explorer.restore().await.unwrap().unwrap();
        assert_eq!(restored.root(), Path::new("/notes"));
    }

    #[compio::test]
    async fn missing_root_is_neither_opened_nor_remembered() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let state_file = temp_dir.path().join("state.bincode");

        let mut first = explorer(state_file.clone()).await;
        first.open_note(Path::new("/notes")).await.unwrap();
        let result = first.open_note(Path::new("/typo")).await;
        assert!(matches!(result, Err(ExplorerError::RootError { .. })));

        let mut second = explorer(state_file).await;
        let restored = second.restore().await.unwrap().unwrap();
        assert_eq!(restored.root(), Path::new("/notes"));
    }

    #[compio::test]
    async fn restoring_a_vanished_root_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let state_file = temp_dir.path().join("state.bincode");
        let mut state = SessionState::default();
        state.remember_root(Path::new("/gone"));
        state.write(&state_file).await.unwrap();

        let mut explorer = explorer(state_file).await;
        let result = explorer.restore().await;

        assert!(matches!(result, Err(ExplorerError::RootError { .. })));
    }
}

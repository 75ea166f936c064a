use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use colored::Colorize;
use snafu::prelude::*;
use tracing::{debug, info};

use crate::application::RuntimeConfig;
use crate::cli::ExplorerCommand;
use crate::commands::{CommandError, CommandOutcome};
use crate::config::{ConfigError, ExplorerConfig};
use crate::ext::PathExt;
use crate::filesystem::{FileSystem, LocalFileSystem, LocalFileSystemError};
use crate::host::{Host, TerminalHost};
use crate::render::{TreeLine, render_tree};
use crate::session::{Explorer, ExplorerError, ExplorerSession};
use crate::tree::TreeNode;

/// Levels shown when the tree is printed again after a change.
const REFRESH_DEPTH: usize = 1;

pub struct Application;

impl Application {
    pub async fn run(runtime: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let runtime: RuntimeConfig = runtime.into();
        let config = ExplorerConfig::read(&runtime.config_path)
            .await
            .context(ConfigSnafu)?;
        debug!("Loaded config: {:?}", config);

        let state_file = runtime
            .state_file
            .clone()
            .unwrap_or_else(|| config.state_file.clone());
        let fs = Rc::new(
            LocalFileSystem::new(config.trash_dir.clone()).context(FileSystemSnafu)?,
        );
        let host: Rc<dyn Host> = Rc::new(TerminalHost::new());
        let mut explorer = Explorer::new(fs, host, config.listing_options(), state_file).await;

        let session = match &runtime.command {
            ExplorerCommand::Open { path, .. } => explorer
                .open_note(&absolute(path)?)
                .await
                .context(ExplorerSnafu)?,
            _ => explorer
                .restore()
                .await
                .context(ExplorerSnafu)?
                .context(NoRootSnafu)?,
        };

        let changed = Rc::new(Cell::new(false));
        let flag = changed.clone();
        let subscription = session
            .provider()
            .on_did_change_tree_data(move || flag.set(true));

        Self::execute(session, &runtime.command).await?;

        if changed.get() {
            info!("Tree changed, printing it again");
            Self::print_tree(session, REFRESH_DEPTH).await;
        }
        session.provider().unsubscribe(subscription);
        explorer.close();

        Ok(())
    }

    async fn execute<F: FileSystem>(
        session: &ExplorerSession<F>,
        command: &ExplorerCommand,
    ) -> Result<(), ApplicationError> {
        let outcome = match command {
            ExplorerCommand::Open { depth, .. } | ExplorerCommand::Tree { depth } => {
                Self::print_tree(session, *depth).await;
                return Ok(());
            }
            ExplorerCommand::Refresh => {
                session.refresh();
                return Ok(());
            }
            ExplorerCommand::Reveal { path } => {
                let node = Self::locate(session, path).await?;
                Self::print_ancestry(session, &node);
                return Ok(());
            }
            ExplorerCommand::Rename { path, new_name } => {
                let node = Self::locate(session, path).await?;
                session.rename(&node, new_name).await
            }
            ExplorerCommand::Delete { path } => {
                let node = Self::locate(session, path).await?;
                session.delete(&node).await
            }
            ExplorerCommand::NewFile { name, parent } => {
                Self::select_parent(session, parent.as_deref()).await?;
                session.new_file(name).await
            }
            ExplorerCommand::NewDir { name, parent } => {
                Self::select_parent(session, parent.as_deref()).await?;
                session.new_directory(name).await
            }
            ExplorerCommand::Move { sources, into } => {
                let target = Self::locate(session, into).await?;
                let mut nodes = Vec::with_capacity(sources.len());
                for source in sources {
                    nodes.push(Self::locate(session, source).await?);
                }
                let moved = session
                    .move_nodes(&nodes, &target)
                    .await
                    .context(CommandSnafu)?;
                info!("Moved {} entries", moved);
                return Ok(());
            }
        };

        match outcome.context(CommandSnafu)? {
            CommandOutcome::Completed { path } => info!("Done: {}", path.display()),
            other => debug!("Command did not change anything: {:?}", other),
        }
        Ok(())
    }

    async fn locate<F: FileSystem>(
        session: &ExplorerSession<F>,
        path: &Path,
    ) -> Result<Rc<TreeNode>, ApplicationError> {
        let absolute = absolute(path)?;
        session
            .locate(&absolute)
            .await
            .context(NotInTreeSnafu { path: absolute })
    }

    async fn select_parent<F: FileSystem>(
        session: &ExplorerSession<F>,
        parent: Option<&Path>,
    ) -> Result<(), ApplicationError> {
        if let Some(parent) = parent {
            let node = Self::locate(session, parent).await?;
            session.select(vec![node]);
        }
        Ok(())
    }

    async fn print_tree<F: FileSystem>(session: &ExplorerSession<F>, depth: usize) {
        println!("{}", session.title().bold());
        for line in render_tree(session.provider(), depth).await {
            println!("{}", line.styled());
        }
    }

    fn print_ancestry<F: FileSystem>(session: &ExplorerSession<F>, node: &Rc<TreeNode>) {
        let mut chain = vec![node.clone()];
        let mut current = node.clone();
        while let Some(parent) = session.provider().get_parent(&current) {
            chain.push(parent.clone());
            current = parent;
        }

        for (depth, node) in chain.iter().rev().enumerate() {
            let mut item = session.provider().get_tree_item(node);
            if depth == 0 {
                item.label = item.path.display().to_string();
            }
            let line = TreeLine {
                guides: "  ".repeat(depth),
                item,
            };
            println!("{}", line.styled());
        }
    }
}

/// Makes `path` absolute against the working directory and drops `.`/`..`.
fn absolute(path: &Path) -> Result<PathBuf, ApplicationError> {
    std::path::absolute(path)
        .map(|path| path.normalized())
        .context(CurrentDirSnafu { path })
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered during configuration stage"))]
    ConfigError { source: ConfigError },
    #[snafu(display("Failed to set up filesystem access"))]
    FileSystemError { source: LocalFileSystemError },
    #[snafu(display("Failed to open the explorer root"))]
    ExplorerError { source: ExplorerError },
    #[snafu(display("No root has been opened yet, run `pinnote open <path>` first"))]
    NoRootError,
    #[snafu(display("Could not resolve '{}' against the working directory", path.display()))]
    CurrentDirError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("'{}' is not part of the explorer tree", path.display()))]
    NotInTreeError { path: PathBuf },
    #[snafu(display("Explorer command failed"))]
    CommandError { source: CommandError },
}

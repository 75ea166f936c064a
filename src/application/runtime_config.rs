use std::path::PathBuf;

use crate::cli::{Cli, ExplorerCommand};
use crate::config::ExplorerConfig;

/// What a single run was asked to do.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub command: ExplorerCommand,
    pub config_path: PathBuf,
    pub state_file: Option<PathBuf>,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            command: cli.command,
            config_path: cli.config.unwrap_or_else(ExplorerConfig::default_path),
            state_file: cli.state_file,
        }
    }
}

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::application::data::LogLevel;

/// Explore and edit a directory tree of notes.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: ExplorerCommand,

    #[clap(long, short, default_value = "warn", value_enum, global = true)]
    pub log_level: LogLevel,

    /// Explorer configuration file
    #[clap(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Where the last opened root is remembered; overrides the config file
    #[clap(long, global = true)]
    pub state_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ExplorerCommand {
    /// Open a directory as the explorer root and remember it
    Open {
        path: PathBuf,
        /// Levels of directories to expand when printing
        #[clap(long, short, default_value_t = 1)]
        depth: usize,
    },
    /// Print the tree of the last opened root
    Tree {
        #[clap(long, short, default_value_t = 1)]
        depth: usize,
    },
    /// Re-read the last opened root from disk and print it
    Refresh,
    /// Print the chain of directories leading to an entry
    Reveal { path: PathBuf },
    /// Give an entry a new name in the same directory
    Rename { path: PathBuf, new_name: String },
    /// Move an entry to the trash
    Delete { path: PathBuf },
    /// Create an empty file
    NewFile {
        name: String,
        /// Entry to create it next to; defaults to the root
        #[clap(long = "in")]
        parent: Option<PathBuf>,
    },
    /// Create a directory
    NewDir {
        name: String,
        /// Entry to create it next to; defaults to the root
        #[clap(long = "in")]
        parent: Option<PathBuf>,
    },
    /// Move entries into a directory, as if dragged onto it
    Move {
        #[clap(required = true)]
        sources: Vec<PathBuf>,
        #[clap(long)]
        into: PathBuf,
    },
}

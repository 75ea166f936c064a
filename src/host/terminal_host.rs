use std::path::Path;

use colored::Colorize;
use supports_color::Stream;
use tracing::debug;

use super::Host;

/// [`Host`] for the command line: messages go to stderr, opened documents
/// are announced on stdout.
pub struct TerminalHost;

impl TerminalHost {
    pub fn new() -> Self {
        let colors = supports_color::on(Stream::Stderr).is_some();
        debug!("Terminal color support: {}", colors);
        colored::control::set_override(colors);
        Self
    }
}

impl Default for TerminalHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for TerminalHost {
    fn show_warning(&self, message: &str) {
        eprintln!("{} {}", "warning:".yellow().bold(), message);
    }

    fn show_error(&self, message: &str) {
        eprintln!("{} {}", "error:".red().bold(), message);
    }

    fn open_document(&self, path: &Path) {
        println!("{} {}", "open".green().bold(), path.display());
    }
}

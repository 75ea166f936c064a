//! The user-facing surface the explorer reports to.

mod terminal_host;

use std::path::Path;

pub use terminal_host::TerminalHost;

/// What the explorer needs from the application embedding it.
///
/// Warnings are for degraded but recovered situations (a directory that could
/// not be listed), errors for user actions that were refused.
pub trait Host {
    fn show_warning(&self, message: &str);
    fn show_error(&self, message: &str);
    /// Asks the host to open a file for editing.
    fn open_document(&self, path: &Path);
}

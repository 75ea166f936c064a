//! Session lifetime: one open root with its provider, commands and
//! selection, plus the root remembered between runs.

mod explorer;
mod session;
mod session_state;

pub use explorer::{Explorer, ExplorerError};
pub use session::ExplorerSession;
pub use session_state::{SessionState, SessionStateError};

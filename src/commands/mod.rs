mod mutation;

pub use mutation::{CommandError, CommandOutcome, MutationCommands};
pub(crate) use mutation::MoveSnafu;

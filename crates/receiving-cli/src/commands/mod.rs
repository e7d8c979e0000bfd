//! Command handlers, one module per top-level subcommand.

mod commit;
mod draft;
mod init;
mod misc;
mod schedule;
mod vocabulary;

pub use commit::handle_commit;
pub use draft::handle_draft;
pub use init::handle_init;
pub use misc::handle_completions;
pub use schedule::handle_schedule;
pub use vocabulary::handle_vocabulary;

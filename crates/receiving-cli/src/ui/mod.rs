//! UI primitives for the Receiving CLI.
//!
//! - **Context**: Environment detection (TTY, color)
//! - **Mode**: Output mode resolution (json, plain, pretty)
//! - **Theme**: Badges and colors
//! - **Render**: Tables, receipts, hints
//! - **Progress**: Label rendering progress

mod context;
mod mode;
pub mod progress;
pub mod render;
mod theme;

pub use context::UiContext;
pub use mode::OutputMode;
pub use theme::Badge;

pub use render::{badge, error_message, hint, print, receipt, table};

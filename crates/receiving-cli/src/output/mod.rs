//! Output formatting helpers for the CLI.

mod json;
mod text;

pub use json::{draft_json, receipts_json, vocabulary_json};
pub use text::{draft_rows, schedule_rows, vocabulary_rows, DRAFT_HEADERS, SCHEDULE_HEADERS};

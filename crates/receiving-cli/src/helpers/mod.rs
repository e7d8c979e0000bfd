//! Argument parsing helpers for the CLI.

mod parsing;

pub use parsing::{position_to_index, row_update};

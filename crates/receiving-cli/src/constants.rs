//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error
/// - 2: Misuse of shell command (reserved by shells)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Resource not found (config, store, draft, schedule row).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input: duplicate names, bad mass or date, empty submissions.
    pub const INVALID_INPUT: i32 = 4;

    /// Stored schedule workbook could not be decoded.
    pub const CORRUPT_LEDGER: i32 = 6;

    /// A write was rejected; the previous value is intact.
    pub const STORAGE_WRITE: i32 = 7;
}

/// File name of the schedule copy written next to each label document.
pub const SCHEDULE_FILE_NAME: &str = "Receiving Schedule.xlsx";

//! Error types for receiving core operations.
//!
//! Errors are descriptive at the core level; the CLI layer maps these
//! to user-facing messages at the point of the triggering command.

use thiserror::Error;

use crate::codec::CodecError;

/// Result type alias for receiving operations.
pub type Result<T> = std::result::Result<T, ReceivingError>;

/// Core error type for receiving operations.
#[derive(Debug, Error)]
pub enum ReceivingError {
    /// Vocabulary already contains this exact name
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    /// Stored workbook could not be decoded
    #[error("Corrupt ledger: {0}")]
    CorruptLedger(String),

    /// Commit attempted with zero rows
    #[error("Nothing to submit: add at least one row first")]
    EmptySubmission,

    /// Storage write rejected (quota, encode or I/O failure)
    #[error("Storage write failed: {0}")]
    StorageWrite(String),

    /// Storage read error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),
}

impl ReceivingError {
    /// Check whether the stored ledger failed to decode.
    pub fn is_corrupt_ledger(&self) -> bool {
        matches!(self, ReceivingError::CorruptLedger(_))
    }
}

impl From<serde_json::Error> for ReceivingError {
    fn from(err: serde_json::Error) -> Self {
        ReceivingError::Storage(err.to_string())
    }
}

impl From<CodecError> for ReceivingError {
    fn from(err: CodecError) -> Self {
        ReceivingError::CorruptLedger(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_error_maps_to_corrupt_ledger() {
        let err: ReceivingError = CodecError::MissingPart("xl/workbook.xml".to_string()).into();
        assert!(err.is_corrupt_ledger());
        assert!(err.to_string().contains("xl/workbook.xml"));
    }

    #[test]
    fn test_empty_submission_message() {
        let err = ReceivingError::EmptySubmission;
        assert!(err.to_string().contains("at least one row"));
    }
}

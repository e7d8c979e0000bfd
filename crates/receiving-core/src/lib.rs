//! # Receiving Core
//!
//! Core library for Receiving - a receiving log for delivered stock that
//! prints QR labels and keeps an append-only schedule workbook.
//!
//! This crate provides the ledger, editing sessions, vocabularies and label
//! payloads independent of any front end.
//!
//! ## Architecture
//!
//! - **storage**: Key-value store trait and implementations (directory, memory)
//! - **codec**: Minimal XLSX workbook reader/writer
//! - **ledger**: Append-only receiving schedule persisted as one workbook
//! - **session**: Draft staging and whole-ledger editing
//! - **vocabulary**: Supplier and stock-code lists
//! - **state**: Vocabularies and sessions bundled for a front end
//! - **label**: QR payloads and sequential batch rendering

pub mod clock;
pub mod codec;
pub mod dates;
pub mod error;
pub mod fs;
pub mod identity;
pub mod label;
pub mod ledger;
pub mod receipt;
pub mod session;
pub mod state;
pub mod storage;
pub mod vocabulary;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ReceivingError, Result};
pub use identity::{IdGenerator, ReceiptId, SequentialGenerator, UuidGenerator};
pub use label::{render_batch, JsonLabelRenderer, LabelBatch, LabelPayload, LabelRenderer};
pub use ledger::{Commit, Ledger, LedgerStore};
pub use receipt::{Mass, NewReceipt, Receipt};
pub use session::{CommitOutcome, Draft, DraftRef, DraftState, DraftUpdate, EditSession, Session};
pub use state::SessionState;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use vocabulary::{Vocabulary, VocabularyKind};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}

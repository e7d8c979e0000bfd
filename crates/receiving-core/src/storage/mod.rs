//! Persisted key-value storage.
//!
//! The ledger workbook, the vocabulary lists and (for the CLI) the staging
//! drafts each live under one fixed key. A `set` always replaces the whole
//! value in one step; callers encode fully in memory before calling it.

mod file;
mod memory;
pub mod traits;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use traits::KeyValueStore;

/// Key holding the supplier vocabulary (JSON array of strings).
pub const SUPPLIERS_KEY: &str = "qrLabelSuppliers";

/// Key holding the stock-code vocabulary (JSON array of strings).
pub const STOCK_CODES_KEY: &str = "qrLabelStockCodes";

/// Key holding the base64-wrapped ledger workbook.
pub const WORKBOOK_KEY: &str = "receivingScheduleWorkbook";

/// Key holding the serialized staging session between CLI invocations.
pub const DRAFTS_KEY: &str = "receivingDrafts";

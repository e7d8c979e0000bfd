//! Ledger store: the append-only receiving schedule.
//!
//! The ledger is persisted as one XLSX workbook, base64-wrapped, under
//! [`WORKBOOK_KEY`]. Every mutation is a full read-modify-encode-write
//! cycle against the stored value: the new workbook is encoded completely
//! in memory and only then handed to the store in a single `set`, so a
//! failed encode or a rejected write leaves the previous ledger intact.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::codec::{decode_base64, decode_sheet, encode_base64, encode_sheet, Table};
use crate::error::{ReceivingError, Result};
use crate::identity::{IdGenerator, ReceiptId, UuidGenerator};
use crate::receipt::{header_row, NewReceipt, Receipt, COLUMNS, LEGACY_COLUMN_COUNT, SHEET_NAME};
use crate::storage::{KeyValueStore, WORKBOOK_KEY};

/// The committed receipts, in ledger order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    /// Header row as stored (five columns for a ledger not yet upgraded)
    pub header: Vec<String>,
    pub receipts: Vec<Receipt>,
}

impl Ledger {
    pub fn empty() -> Self {
        Self {
            header: header_row(),
            receipts: Vec::new(),
        }
    }

    /// Parse a decoded sheet, checking its header against the schema.
    pub fn from_table(table: &Table) -> Result<Self> {
        check_header(&table.header)?;

        let receipts = table
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| !is_blank_row(row))
            .map(|(index, row)| Receipt::from_row(row, index + 2))
            .collect::<Result<Vec<_>>>()?;

        let header = if table.header.is_empty() {
            header_row()
        } else {
            table.header.clone()
        };
        Ok(Self { header, receipts })
    }

    pub fn len(&self) -> usize {
        self.receipts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receipts.is_empty()
    }

    /// Whether the stored header already carries the UUID column.
    pub fn has_id_column(&self) -> bool {
        self.header.len() > LEGACY_COLUMN_COUNT
    }

    pub fn find(&self, id: &ReceiptId) -> Option<&Receipt> {
        self.receipts.iter().find(|r| r.id.as_ref() == Some(id))
    }
}

/// Result of an append commit.
#[derive(Debug, Clone)]
pub struct Commit {
    /// Every candidate, finalized, in the order offered
    pub receipts: Vec<Receipt>,

    /// How many of them were new rows
    pub appended: usize,

    /// The workbook exactly as persisted
    pub workbook: Vec<u8>,
}

/// Single source of truth for committed receipts.
pub struct LedgerStore<S, G = UuidGenerator, C = SystemClock> {
    store: S,
    ids: G,
    clock: C,
}

impl<S: KeyValueStore> LedgerStore<S> {
    pub fn new(store: S) -> Self {
        Self::with_parts(store, UuidGenerator, SystemClock)
    }
}

impl<S: KeyValueStore, G: IdGenerator, C: Clock> LedgerStore<S, G, C> {
    pub fn with_parts(store: S, ids: G, clock: C) -> Self {
        Self { store, ids, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Load the ledger. An absent workbook is an empty ledger.
    ///
    /// # Errors
    ///
    /// Returns `ReceivingError::CorruptLedger` if the stored workbook cannot
    /// be decoded. The stored value is left as it is.
    pub fn load(&self) -> Result<Ledger> {
        match self.read_table()? {
            Some(table) => Ledger::from_table(&table).inspect_err(|e| {
                warn!(error = %e, "stored ledger rows could not be parsed");
            }),
            None => Ok(Ledger::empty()),
        }
    }

    /// Append candidates to the ledger.
    ///
    /// Candidates without an id get a fresh one and a capture stamp.
    /// Candidates whose id is already in the ledger are finalized from the
    /// stored row's identity without appending, so re-committing never
    /// duplicates a receipt. Order of the returned receipts follows the
    /// candidates.
    ///
    /// # Errors
    ///
    /// - `EmptySubmission` if `candidates` is empty
    /// - `Validation` if a candidate lacks supplier or stock code
    /// - `CorruptLedger` if the stored workbook is unreadable (nothing is written)
    /// - `StorageWrite` if encoding or the store write fails (the prior ledger survives)
    pub fn append_commit(&mut self, candidates: Vec<NewReceipt>) -> Result<Commit> {
        if candidates.is_empty() {
            return Err(ReceivingError::EmptySubmission);
        }
        for candidate in &candidates {
            candidate.validate()?;
        }

        let mut table = self
            .read_table()?
            .unwrap_or_else(|| Table::new(header_row()));
        let ledger = Ledger::from_table(&table)?;
        upgrade_header(&mut table);

        let mut known: HashSet<ReceiptId> =
            ledger.receipts.iter().filter_map(|r| r.id.clone()).collect();
        let mut receipts = Vec::with_capacity(candidates.len());
        let mut appended = 0;

        for candidate in candidates {
            if let Some(id) = candidate.id.clone().filter(|id| known.contains(id)) {
                let captured_at = candidate
                    .captured_at
                    .clone()
                    .or_else(|| ledger.find(&id).map(|r| r.captured_at.clone()))
                    .unwrap_or_default();
                debug!(id = %id, "receipt already logged; reusing identity");
                receipts.push(finalize(candidate, id, captured_at));
                continue;
            }

            let id = match candidate.id.clone() {
                Some(id) => id,
                None => self.fresh_id(&known),
            };
            let captured_at = candidate
                .captured_at
                .clone()
                .unwrap_or_else(|| self.clock.timestamp());
            let receipt = finalize(candidate, id.clone(), captured_at);

            table.rows.push(receipt.to_row());
            known.insert(id);
            receipts.push(receipt);
            appended += 1;
        }

        let workbook = self.persist(&table)?;
        info!(
            appended,
            total = ledger.len() + appended,
            "committed receipts to ledger"
        );
        Ok(Commit {
            receipts,
            appended,
            workbook,
        })
    }

    /// Replace the whole ledger with `receipts`, in the given order.
    ///
    /// No identifiers are assigned; rows keep whatever identity they carry.
    /// The stored value is replaced even if it was unreadable.
    ///
    /// The header written is exactly the schema. Columns past `UUID` that a
    /// stored workbook carried (kept by [`append_commit`](Self::append_commit))
    /// are dropped together with their cells.
    ///
    /// # Errors
    ///
    /// - `Validation` if a receipt lacks supplier or stock code, or two share an id
    /// - `StorageWrite` if encoding or the store write fails
    pub fn rewrite_all(&mut self, receipts: &[Receipt]) -> Result<Vec<u8>> {
        let mut seen = HashSet::new();
        for receipt in receipts {
            receipt.validate()?;
            if let Some(id) = &receipt.id {
                if !seen.insert(id) {
                    return Err(ReceivingError::Validation(format!(
                        "Receipt id {} appears more than once",
                        id
                    )));
                }
            }
        }

        let table =
            Table::new(header_row()).with_rows(receipts.iter().map(Receipt::to_row).collect());
        let workbook = self.persist(&table)?;
        info!(rows = receipts.len(), "rewrote ledger");
        Ok(workbook)
    }

    /// The stored workbook bytes, for download.
    pub fn export(&self) -> Result<Option<Vec<u8>>> {
        match self.store.get(WORKBOOK_KEY)? {
            Some(text) => Ok(Some(decode_base64(&text)?)),
            None => Ok(None),
        }
    }

    /// Replace the ledger with the receiving schedule in a downloaded workbook.
    ///
    /// Rows keep their ids; a five-column file comes back upgraded.
    ///
    /// # Errors
    ///
    /// `Validation` if `bytes` is not a readable receiving schedule. The
    /// stored ledger is only touched once the file has been fully parsed.
    pub fn import(&mut self, bytes: &[u8]) -> Result<Ledger> {
        let unreadable = |reason: String| {
            ReceivingError::Validation(format!("Not a readable workbook: {}", reason))
        };
        let table = decode_sheet(bytes, SHEET_NAME)
            .map_err(|e| unreadable(e.to_string()))?
            .ok_or_else(|| unreadable(format!("no \"{}\" sheet", SHEET_NAME)))?;
        let mut ledger = Ledger::from_table(&table).map_err(|e| match e {
            ReceivingError::CorruptLedger(reason) => unreadable(reason),
            other => other,
        })?;
        self.rewrite_all(&ledger.receipts)?;
        ledger.header = header_row();
        Ok(ledger)
    }

    fn read_table(&self) -> Result<Option<Table>> {
        let Some(text) = self.store.get(WORKBOOK_KEY)? else {
            return Ok(None);
        };

        let decoded = decode_base64(&text)
            .map_err(ReceivingError::from)
            .and_then(|bytes| decode_sheet(&bytes, SHEET_NAME).map_err(ReceivingError::from))
            .and_then(|table| {
                table.ok_or_else(|| {
                    ReceivingError::CorruptLedger(format!("no \"{}\" sheet", SHEET_NAME))
                })
            });

        match decoded {
            Ok(table) => Ok(Some(table)),
            Err(e) => {
                warn!(error = %e, "stored ledger could not be decoded");
                Err(e)
            }
        }
    }

    fn persist(&mut self, table: &Table) -> Result<Vec<u8>> {
        let workbook = encode_sheet(SHEET_NAME, table)
            .map_err(|e| ReceivingError::StorageWrite(format!("Workbook encode failed: {}", e)))?;
        let text = encode_base64(&workbook);
        if let Err(e) = self.store.set(WORKBOOK_KEY, &text) {
            warn!(error = %e, "ledger write rejected; stored ledger unchanged");
            return Err(e);
        }
        Ok(workbook)
    }

    fn fresh_id(&mut self, known: &HashSet<ReceiptId>) -> ReceiptId {
        loop {
            let id = self.ids.next_id();
            if !known.contains(&id) {
                return id;
            }
        }
    }
}

fn finalize(candidate: NewReceipt, id: ReceiptId, captured_at: String) -> Receipt {
    Receipt {
        supplier: candidate.supplier,
        stock_code: candidate.stock_code,
        mass: candidate.mass,
        receipt_date: candidate.receipt_date,
        captured_at,
        id: Some(id),
    }
}

fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

/// The stored header must be the schema, or its five-column legacy prefix.
/// Columns past the schema are tolerated and left alone.
fn check_header(header: &[String]) -> Result<()> {
    if header.is_empty() {
        return Ok(());
    }
    if header.len() < LEGACY_COLUMN_COUNT {
        return Err(ReceivingError::CorruptLedger(format!(
            "unexpected header: {}",
            header.join(", ")
        )));
    }
    for (found, expected) in header.iter().zip(COLUMNS.iter()) {
        if found.trim() != *expected {
            return Err(ReceivingError::CorruptLedger(format!(
                "unexpected column \"{}\" where \"{}\" belongs",
                found, expected
            )));
        }
    }
    Ok(())
}

/// Give a legacy or empty header the full schema, leaving data rows alone.
fn upgrade_header(table: &mut Table) {
    if table.header.is_empty() {
        table.header = header_row();
    } else if table.header.len() == LEGACY_COLUMN_COUNT {
        debug!("appending UUID column to legacy ledger header");
        table.header.push(COLUMNS[LEGACY_COLUMN_COUNT].to_string());
    }
}

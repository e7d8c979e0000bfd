//! Row editing sessions.
//!
//! [`Session`] stages new receipts before they are committed to the ledger.
//! [`EditSession`] holds a loaded copy of the ledger for whole-table edits
//! saved back with [`LedgerStore::rewrite_all`].

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::Clock;
use crate::error::{ReceivingError, Result};
use crate::identity::{IdGenerator, ReceiptId};
use crate::ledger::{Commit, Ledger, LedgerStore};
use crate::receipt::{Mass, NewReceipt, Receipt};
use crate::storage::KeyValueStore;
use crate::vocabulary::{Vocabulary, VocabularyKind};

/// Stable handle to a draft. Never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DraftRef(u64);

impl DraftRef {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DraftRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a draft has been logged yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DraftState {
    Uncommitted,
    Committed {
        id: ReceiptId,
        captured_at: String,
    },
}

impl DraftState {
    pub fn is_committed(&self) -> bool {
        matches!(self, DraftState::Committed { .. })
    }
}

/// An in-session receipt awaiting commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub draft_ref: DraftRef,
    pub supplier: String,
    pub stock_code: String,

    /// Mass text as entered; blank commits as zero
    pub mass: String,
    pub receipt_date: NaiveDate,
    pub state: DraftState,

    /// Id set aside for the next commit of an uncommitted draft
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reserved_id: Option<ReceiptId>,
}

impl Draft {
    fn to_candidate(&self) -> Result<NewReceipt> {
        let candidate = NewReceipt::new(
            self.supplier.clone(),
            self.stock_code.clone(),
            Mass::parse(&self.mass)?,
            self.receipt_date,
        );
        Ok(match &self.state {
            DraftState::Uncommitted => NewReceipt {
                id: self.reserved_id.clone(),
                ..candidate
            },
            DraftState::Committed { id, captured_at } => {
                candidate.with_identity(id.clone(), captured_at.clone())
            }
        })
    }

    fn selection_mut(&mut self, kind: VocabularyKind) -> &mut String {
        match kind {
            VocabularyKind::Suppliers => &mut self.supplier,
            VocabularyKind::StockCodes => &mut self.stock_code,
        }
    }
}

/// Field changes for a draft or editor row. `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftUpdate {
    pub supplier: Option<String>,
    pub stock_code: Option<String>,
    pub mass: Option<String>,
    pub receipt_date: Option<NaiveDate>,
}

impl DraftUpdate {
    pub fn is_empty(&self) -> bool {
        self.supplier.is_none()
            && self.stock_code.is_none()
            && self.mass.is_none()
            && self.receipt_date.is_none()
    }

    /// Check every supplied field before anything is applied.
    fn validate(&self) -> Result<Option<Mass>> {
        for (field, value) in [
            ("Supplier", &self.supplier),
            ("Stock code", &self.stock_code),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(ReceivingError::Validation(format!(
                    "{} must not be empty",
                    field
                )));
            }
        }
        self.mass.as_deref().map(Mass::parse).transpose()
    }
}

/// Drafts committed in one call, paired with their finalized receipts.
#[derive(Debug, Clone)]
pub struct CommitOutcome {
    pub drafts: Vec<DraftRef>,
    pub commit: Commit,
}

impl CommitOutcome {
    pub fn receipts(&self) -> &[Receipt] {
        &self.commit.receipts
    }
}

/// Staging area for new receipts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    drafts: Vec<Draft>,
    next_ref: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drafts(&self) -> &[Draft] {
        &self.drafts
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    pub fn get(&self, draft_ref: DraftRef) -> Option<&Draft> {
        self.drafts.iter().find(|d| d.draft_ref == draft_ref)
    }

    /// The draft new rows copy their defaults from.
    pub fn first_ref(&self) -> Option<DraftRef> {
        self.drafts.first().map(|d| d.draft_ref)
    }

    /// Append a draft.
    ///
    /// With a template, supplier, stock code and date are copied from it.
    /// Otherwise they default to the first vocabulary entries and `today`.
    /// Mass always starts blank.
    pub fn add_draft(
        &mut self,
        template: Option<DraftRef>,
        suppliers: &Vocabulary,
        stock_codes: &Vocabulary,
        today: NaiveDate,
    ) -> Result<DraftRef> {
        let (supplier, stock_code, receipt_date) = match template {
            Some(template) => {
                let source = self.find(template)?;
                (
                    source.supplier.clone(),
                    source.stock_code.clone(),
                    source.receipt_date,
                )
            }
            None => (
                suppliers.first().unwrap_or_default().to_string(),
                stock_codes.first().unwrap_or_default().to_string(),
                today,
            ),
        };

        self.next_ref += 1;
        let draft_ref = DraftRef(self.next_ref);
        self.drafts.push(Draft {
            draft_ref,
            supplier,
            stock_code,
            mass: String::new(),
            receipt_date,
            state: DraftState::Uncommitted,
            reserved_id: None,
        });
        Ok(draft_ref)
    }

    pub fn remove_draft(&mut self, draft_ref: DraftRef) -> Result<Draft> {
        let index = self.index_of(draft_ref)?;
        Ok(self.drafts.remove(index))
    }

    /// Apply field changes to a draft.
    ///
    /// A committed draft whose fields change is uncommitted again: its
    /// label would no longer describe the logged row.
    pub fn update_draft(&mut self, draft_ref: DraftRef, update: DraftUpdate) -> Result<&Draft> {
        let mass = update.validate()?;
        let index = self.index_of(draft_ref)?;
        let draft = &mut self.drafts[index];
        let before = draft.clone();

        if let Some(supplier) = update.supplier {
            draft.supplier = supplier.trim().to_string();
        }
        if let Some(stock_code) = update.stock_code {
            draft.stock_code = stock_code.trim().to_string();
        }
        if let Some(mass) = mass {
            draft.mass = mass.to_string();
        }
        if let Some(date) = update.receipt_date {
            draft.receipt_date = date;
        }

        let changed = draft.supplier != before.supplier
            || draft.stock_code != before.stock_code
            || draft.mass != before.mass
            || draft.receipt_date != before.receipt_date;
        if changed {
            // the reserved id may already name the unedited receipt
            draft.reserved_id = None;
            if draft.state.is_committed() {
                debug!(draft = %draft_ref, "edited committed draft; will log as a new receipt");
                draft.state = DraftState::Uncommitted;
            }
        }
        Ok(&self.drafts[index])
    }

    /// Commit every draft through the ledger, in order.
    ///
    /// Drafts already committed keep their identity and are not appended
    /// again. On success every draft is `Committed`; on failure none change.
    pub fn commit_visible<S, G, C>(
        &mut self,
        ledger: &mut LedgerStore<S, G, C>,
    ) -> Result<CommitOutcome>
    where
        S: KeyValueStore,
        G: IdGenerator,
        C: Clock,
    {
        if self.drafts.is_empty() {
            return Err(ReceivingError::EmptySubmission);
        }

        let candidates = self
            .drafts
            .iter()
            .map(Draft::to_candidate)
            .collect::<Result<Vec<_>>>()?;
        let commit = ledger.append_commit(candidates)?;

        for (draft, receipt) in self.drafts.iter_mut().zip(&commit.receipts) {
            if let Some(id) = &receipt.id {
                draft.mass = receipt.mass.to_string();
                draft.reserved_id = None;
                draft.state = DraftState::Committed {
                    id: id.clone(),
                    captured_at: receipt.captured_at.clone(),
                };
            }
        }

        Ok(CommitOutcome {
            drafts: self.drafts.iter().map(|d| d.draft_ref).collect(),
            commit,
        })
    }

    /// Set aside the id each uncommitted draft will be logged under.
    ///
    /// A session saved after this can retry its commit safely: receipts
    /// that reached the ledger are recognised by id and not appended
    /// again. Returns how many drafts got a new reservation.
    pub fn reserve_ids<G: IdGenerator>(&mut self, ids: &mut G) -> usize {
        let mut reserved = 0;
        for draft in &mut self.drafts {
            if draft.state.is_committed() || draft.reserved_id.is_some() {
                continue;
            }
            draft.reserved_id = Some(ids.next_id());
            reserved += 1;
        }
        reserved
    }

    /// Drop every draft. Handles are not reused afterwards.
    pub fn clear(&mut self) {
        self.drafts.clear();
    }

    /// Point drafts that selected a removed vocabulary entry at the list's
    /// first remaining entry, or at nothing when the list is empty.
    pub fn reconcile(&mut self, kind: VocabularyKind, removed: &str, vocabulary: &Vocabulary) {
        let fallback = vocabulary.first().unwrap_or_default();
        for draft in &mut self.drafts {
            let selection = draft.selection_mut(kind);
            if selection == removed {
                *selection = fallback.to_string();
            }
        }
    }

    fn find(&self, draft_ref: DraftRef) -> Result<&Draft> {
        self.get(draft_ref)
            .ok_or_else(|| ReceivingError::NotFound(format!("draft {}", draft_ref)))
    }

    fn index_of(&self, draft_ref: DraftRef) -> Result<usize> {
        self.drafts
            .iter()
            .position(|d| d.draft_ref == draft_ref)
            .ok_or_else(|| ReceivingError::NotFound(format!("draft {}", draft_ref)))
    }
}

/// Loaded copy of the ledger for whole-table editing.
///
/// Rows are addressed by position, as shown to the operator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSession {
    rows: Vec<Receipt>,
}

impl EditSession {
    pub fn load(ledger: &Ledger) -> Self {
        Self {
            rows: ledger.receipts.clone(),
        }
    }

    pub fn rows(&self) -> &[Receipt] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row stamped now, with default selections and today's date.
    ///
    /// The row has no id; saving rewrites rather than commits.
    pub fn add_row<C: Clock>(
        &mut self,
        suppliers: &Vocabulary,
        stock_codes: &Vocabulary,
        clock: &C,
    ) -> usize {
        self.rows.push(Receipt {
            supplier: suppliers.first().unwrap_or_default().to_string(),
            stock_code: stock_codes.first().unwrap_or_default().to_string(),
            mass: Mass::zero(),
            receipt_date: clock.today(),
            captured_at: clock.timestamp(),
            id: None,
        });
        self.rows.len() - 1
    }

    pub fn update_row(&mut self, index: usize, update: DraftUpdate) -> Result<&Receipt> {
        let mass = update.validate()?;
        let row = self
            .rows
            .get_mut(index)
            .ok_or_else(|| ReceivingError::NotFound(format!("schedule row {}", index + 1)))?;

        if let Some(supplier) = update.supplier {
            row.supplier = supplier.trim().to_string();
        }
        if let Some(stock_code) = update.stock_code {
            row.stock_code = stock_code.trim().to_string();
        }
        if let Some(mass) = mass {
            row.mass = mass;
        }
        if let Some(date) = update.receipt_date {
            row.receipt_date = date;
        }
        Ok(&*row)
    }

    pub fn remove_row(&mut self, index: usize) -> Result<Receipt> {
        if index >= self.rows.len() {
            return Err(ReceivingError::NotFound(format!(
                "schedule row {}",
                index + 1
            )));
        }
        Ok(self.rows.remove(index))
    }

    /// Write every row back as the whole ledger.
    ///
    /// # Errors
    ///
    /// `EmptySubmission` when the editor holds no rows; otherwise whatever
    /// [`LedgerStore::rewrite_all`] reports.
    pub fn save<S, G, C>(&self, ledger: &mut LedgerStore<S, G, C>) -> Result<Vec<u8>>
    where
        S: KeyValueStore,
        G: IdGenerator,
        C: Clock,
    {
        if self.rows.is_empty() {
            return Err(ReceivingError::EmptySubmission);
        }
        ledger.rewrite_all(&self.rows)
    }

    /// Same fallback as [`Session::reconcile`], for editor rows.
    pub fn reconcile(&mut self, kind: VocabularyKind, removed: &str, vocabulary: &Vocabulary) {
        let fallback = vocabulary.first().unwrap_or_default();
        for row in &mut self.rows {
            let selection = match kind {
                VocabularyKind::Suppliers => &mut row.supplier,
                VocabularyKind::StockCodes => &mut row.stock_code,
            };
            if selection == removed {
                *selection = fallback.to_string();
            }
        }
    }
}

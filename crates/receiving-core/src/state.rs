//! Everything an operator has open at once.

use chrono::NaiveDate;

use crate::error::Result;
use crate::ledger::Ledger;
use crate::session::{DraftRef, EditSession, Session};
use crate::storage::KeyValueStore;
use crate::vocabulary::{Vocabulary, VocabularyKind};

/// Vocabularies plus the staging session and, when open, the ledger editor.
///
/// Vocabulary changes are persisted through the given store and pushed into
/// every open draft and editor row before the call returns.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub suppliers: Vocabulary,
    pub stock_codes: Vocabulary,
    pub staging: Session,
    pub editor: Option<EditSession>,
}

impl SessionState {
    /// Load both vocabularies (seeding defaults) with an empty staging session.
    pub fn load<S: KeyValueStore>(store: &mut S) -> Result<Self> {
        Ok(Self {
            suppliers: Vocabulary::load(store, VocabularyKind::Suppliers)?,
            stock_codes: Vocabulary::load(store, VocabularyKind::StockCodes)?,
            staging: Session::new(),
            editor: None,
        })
    }

    pub fn with_staging(mut self, staging: Session) -> Self {
        self.staging = staging;
        self
    }

    pub fn vocabulary(&self, kind: VocabularyKind) -> &Vocabulary {
        match kind {
            VocabularyKind::Suppliers => &self.suppliers,
            VocabularyKind::StockCodes => &self.stock_codes,
        }
    }

    fn vocabulary_mut(&mut self, kind: VocabularyKind) -> &mut Vocabulary {
        match kind {
            VocabularyKind::Suppliers => &mut self.suppliers,
            VocabularyKind::StockCodes => &mut self.stock_codes,
        }
    }

    /// Stage a new draft, defaulting from the first draft when there is one.
    pub fn add_draft(&mut self, today: NaiveDate) -> Result<DraftRef> {
        let template = self.staging.first_ref();
        self.staging
            .add_draft(template, &self.suppliers, &self.stock_codes, today)
    }

    /// Open the ledger editor on a freshly loaded ledger.
    pub fn open_editor(&mut self, ledger: &Ledger) -> &mut EditSession {
        self.editor.insert(EditSession::load(ledger))
    }

    pub fn add_vocabulary_entry<S: KeyValueStore>(
        &mut self,
        store: &mut S,
        kind: VocabularyKind,
        name: &str,
    ) -> Result<String> {
        self.vocabulary_mut(kind).add(store, name)
    }

    /// Remove an entry and move any selection of it to the new first entry.
    pub fn remove_vocabulary_entry<S: KeyValueStore>(
        &mut self,
        store: &mut S,
        kind: VocabularyKind,
        index: usize,
    ) -> Result<String> {
        let removed = self.vocabulary_mut(kind).remove(store, index)?;

        let vocabulary = match kind {
            VocabularyKind::Suppliers => &self.suppliers,
            VocabularyKind::StockCodes => &self.stock_codes,
        };
        self.staging.reconcile(kind, &removed, vocabulary);
        if let Some(editor) = self.editor.as_mut() {
            editor.reconcile(kind, &removed, vocabulary);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReceivingError;
    use crate::storage::{MemoryStore, SUPPLIERS_KEY};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    #[test]
    fn test_removal_propagates_to_drafts() {
        let mut store = MemoryStore::new();
        let mut state = SessionState::load(&mut store).unwrap();
        let first = state.add_draft(today()).unwrap();
        let second = state.add_draft(today()).unwrap();

        let removed = state
            .remove_vocabulary_entry(&mut store, VocabularyKind::Suppliers, 0)
            .unwrap();
        assert_eq!(removed, "Supplier A");
        assert_eq!(state.suppliers.len(), 2);
        for r in [first, second] {
            assert_eq!(state.staging.get(r).unwrap().supplier, "Supplier B");
        }
        assert_eq!(
            store.get(SUPPLIERS_KEY).unwrap().as_deref(),
            Some(r#"["Supplier B","Supplier C"]"#)
        );
    }

    #[test]
    fn test_removal_propagates_to_editor() {
        let mut store = MemoryStore::new();
        let mut state = SessionState::load(&mut store).unwrap();
        let clock = crate::clock::FixedClock::at(2024, 3, 5, 8, 0, 0).unwrap();
        let suppliers = state.suppliers.clone();
        let codes = state.stock_codes.clone();
        state
            .open_editor(&Ledger::empty())
            .add_row(&suppliers, &codes, &clock);

        state
            .remove_vocabulary_entry(&mut store, VocabularyKind::StockCodes, 0)
            .unwrap();
        let editor = state.editor.as_ref().unwrap();
        assert_eq!(editor.rows()[0].stock_code, "SC002");
    }

    #[test]
    fn test_unselected_removal_leaves_drafts() {
        let mut store = MemoryStore::new();
        let mut state = SessionState::load(&mut store).unwrap();
        let r = state.add_draft(today()).unwrap();
        state
            .remove_vocabulary_entry(&mut store, VocabularyKind::StockCodes, 2)
            .unwrap();
        assert_eq!(state.staging.get(r).unwrap().stock_code, "SC001");
    }

    #[test]
    fn test_duplicate_add_reported() {
        let mut store = MemoryStore::new();
        let mut state = SessionState::load(&mut store).unwrap();
        let err = state
            .add_vocabulary_entry(&mut store, VocabularyKind::StockCodes, "SC002")
            .unwrap_err();
        assert!(matches!(err, ReceivingError::DuplicateEntry(_)));
        assert_eq!(state.vocabulary(VocabularyKind::StockCodes).len(), 3);
    }
}

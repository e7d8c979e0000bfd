//! Supplier and stock-code lists.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ReceivingError, Result};
use crate::storage::{KeyValueStore, STOCK_CODES_KEY, SUPPLIERS_KEY};

/// Which list a vocabulary holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VocabularyKind {
    Suppliers,
    StockCodes,
}

impl VocabularyKind {
    pub fn key(self) -> &'static str {
        match self {
            VocabularyKind::Suppliers => SUPPLIERS_KEY,
            VocabularyKind::StockCodes => STOCK_CODES_KEY,
        }
    }

    /// Entries written the first time the list is loaded.
    pub fn defaults(self) -> &'static [&'static str] {
        match self {
            VocabularyKind::Suppliers => &["Supplier A", "Supplier B", "Supplier C"],
            VocabularyKind::StockCodes => &["SC001", "SC002", "SC003"],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VocabularyKind::Suppliers => "Supplier",
            VocabularyKind::StockCodes => "Stock code",
        }
    }
}

/// An ordered list of selectable names, persisted as a JSON array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    kind: VocabularyKind,
    entries: Vec<String>,
}

impl Vocabulary {
    /// Load a list, seeding and persisting its defaults when absent.
    pub fn load<S: KeyValueStore>(store: &mut S, kind: VocabularyKind) -> Result<Self> {
        if let Some(text) = store.get(kind.key())? {
            let entries: Vec<String> = serde_json::from_str(&text)?;
            return Ok(Self { kind, entries });
        }

        let vocabulary = Self::from_entries(kind, kind.defaults().iter().map(|s| s.to_string()));
        vocabulary.persist(store, &vocabulary.entries)?;
        debug!(key = kind.key(), "seeded default vocabulary");
        Ok(vocabulary)
    }

    pub fn from_entries(kind: VocabularyKind, entries: impl IntoIterator<Item = String>) -> Self {
        Self {
            kind,
            entries: entries.into_iter().collect(),
        }
    }

    pub fn kind(&self) -> VocabularyKind {
        self.kind
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Default selection for new rows.
    pub fn first(&self) -> Option<&str> {
        self.entries.first().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry == name)
    }

    /// Add a name and persist the list. Returns the stored (trimmed) name.
    ///
    /// # Errors
    ///
    /// - `Validation` for a blank name
    /// - `DuplicateEntry` if the name is already listed (exact match)
    /// - any storage error; the list is unchanged on failure
    pub fn add<S: KeyValueStore>(&mut self, store: &mut S, name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ReceivingError::Validation(format!(
                "{} name must not be empty",
                self.kind.label()
            )));
        }
        if self.contains(name) {
            return Err(ReceivingError::DuplicateEntry(name.to_string()));
        }

        let mut entries = self.entries.clone();
        entries.push(name.to_string());
        self.persist(store, &entries)?;
        self.entries = entries;
        Ok(name.to_string())
    }

    /// Remove the entry at `index` and persist the list. Returns the removed name.
    pub fn remove<S: KeyValueStore>(&mut self, store: &mut S, index: usize) -> Result<String> {
        if index >= self.entries.len() {
            return Err(ReceivingError::NotFound(format!(
                "{} #{} (list has {})",
                self.kind.label(),
                index,
                self.entries.len()
            )));
        }

        let mut entries = self.entries.clone();
        let removed = entries.remove(index);
        self.persist(store, &entries)?;
        self.entries = entries;
        Ok(removed)
    }

    fn persist<S: KeyValueStore>(&self, store: &mut S, entries: &[String]) -> Result<()> {
        let text = serde_json::to_string(entries)?;
        store.set(self.kind.key(), &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_load_seeds_defaults() {
        let mut store = MemoryStore::new();
        let suppliers = Vocabulary::load(&mut store, VocabularyKind::Suppliers).unwrap();
        assert_eq!(suppliers.first(), Some("Supplier A"));
        assert_eq!(
            store.get(SUPPLIERS_KEY).unwrap().as_deref(),
            Some(r#"["Supplier A","Supplier B","Supplier C"]"#)
        );
    }

    #[test]
    fn test_load_keeps_stored_list() {
        let mut store = MemoryStore::new();
        store.set(STOCK_CODES_KEY, r#"["X1"]"#).unwrap();
        let codes = Vocabulary::load(&mut store, VocabularyKind::StockCodes).unwrap();
        assert_eq!(codes.entries(), ["X1".to_string()]);
    }

    #[test]
    fn test_duplicate_add_leaves_list_unchanged() {
        let mut store = MemoryStore::new();
        let mut suppliers = Vocabulary::load(&mut store, VocabularyKind::Suppliers).unwrap();

        assert_eq!(suppliers.add(&mut store, " Acme ").unwrap(), "Acme");
        let err = suppliers.add(&mut store, "Acme").unwrap_err();
        assert!(matches!(err, ReceivingError::DuplicateEntry(_)));
        assert_eq!(suppliers.len(), 4);

        // exact match only
        suppliers.add(&mut store, "acme").unwrap();
        assert_eq!(suppliers.len(), 5);
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut store = MemoryStore::new();
        let mut codes = Vocabulary::load(&mut store, VocabularyKind::StockCodes).unwrap();
        assert!(matches!(
            codes.add(&mut store, "   "),
            Err(ReceivingError::Validation(_))
        ));
    }

    #[test]
    fn test_remove_persists() {
        let mut store = MemoryStore::new();
        let mut codes = Vocabulary::load(&mut store, VocabularyKind::StockCodes).unwrap();
        assert_eq!(codes.remove(&mut store, 0).unwrap(), "SC001");
        assert_eq!(codes.len(), 2);

        let reloaded = Vocabulary::load(&mut store, VocabularyKind::StockCodes).unwrap();
        assert_eq!(reloaded, codes);
        assert!(matches!(
            codes.remove(&mut store, 9),
            Err(ReceivingError::NotFound(_))
        ));
    }

    #[test]
    fn test_failed_write_keeps_entries() {
        let mut store = MemoryStore::new();
        let mut suppliers = Vocabulary::load(&mut store, VocabularyKind::Suppliers).unwrap();
        store.fail_writes(true);
        assert!(suppliers.add(&mut store, "Acme").is_err());
        assert_eq!(suppliers.len(), 3);
    }
}

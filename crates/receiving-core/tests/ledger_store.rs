use std::fs;

use chrono::NaiveDate;
use receiving_core::codec::{decode_sheet, encode_base64, encode_sheet, Table};
use receiving_core::receipt::{COLUMNS, SHEET_NAME};
use receiving_core::storage::{DRAFTS_KEY, WORKBOOK_KEY};
use receiving_core::{
    FileStore, KeyValueStore, LedgerStore, Mass, NewReceipt, ReceivingError, Session,
    SessionState, UuidGenerator,
};
use tempfile::tempdir;

/// Accepts ledger writes but rejects every write to the staged drafts.
struct DraftsUnwritable<'a>(&'a mut FileStore);

impl KeyValueStore for DraftsUnwritable<'_> {
    fn get(&self, key: &str) -> receiving_core::Result<Option<String>> {
        self.0.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> receiving_core::Result<()> {
        if key == DRAFTS_KEY {
            return Err(ReceivingError::StorageWrite("drafts are read-only".to_string()));
        }
        self.0.set(key, value)
    }

    fn remove(&mut self, key: &str) -> receiving_core::Result<()> {
        self.0.remove(key)
    }
}

fn candidate(supplier: &str, mass: &str, day: u32) -> NewReceipt {
    NewReceipt::new(
        supplier,
        "SC001",
        Mass::parse(mass).expect("mass should parse"),
        NaiveDate::from_ymd_opt(2024, 3, day).expect("valid date"),
    )
}

#[test]
fn test_row_count_is_sum_of_commits() {
    let dir = tempdir().expect("tempdir should be created");
    let store = FileStore::open(dir.path()).expect("store should open");
    let mut ledger = LedgerStore::new(store);

    let batches = [1usize, 3, 2];
    for (n, size) in batches.iter().enumerate() {
        let rows = (0..*size)
            .map(|i| candidate(&format!("Supplier {}", n), &i.to_string(), 1 + i as u32))
            .collect();
        ledger.append_commit(rows).expect("commit should succeed");
    }

    let loaded = ledger.load().expect("load should succeed");
    assert_eq!(loaded.len(), batches.iter().sum::<usize>());
    assert!(loaded.receipts.iter().all(|r| r.id.is_some()));

    // a fresh store over the same directory sees the same ledger
    let reopened = LedgerStore::new(FileStore::open(dir.path()).expect("store should reopen"));
    assert_eq!(reopened.load().expect("load should succeed"), loaded);
}

#[test]
fn test_fresh_storage_scenario() {
    let dir = tempdir().expect("tempdir should be created");
    let mut store = FileStore::open(dir.path()).expect("store should open");
    let mut state = SessionState::load(&mut store).expect("state should load");

    let today = NaiveDate::from_ymd_opt(2024, 3, 5).expect("valid date");
    let draft = state.add_draft(today).expect("draft should be added");
    assert_eq!(
        state.staging.get(draft).expect("draft exists").supplier,
        "Supplier A"
    );

    let mut ledger = LedgerStore::new(&mut store);
    let outcome = state
        .staging
        .commit_visible(&mut ledger)
        .expect("commit should succeed");
    let receipt = &outcome.receipts()[0];
    assert_eq!(receipt.mass.as_str(), "0");

    let bytes = ledger
        .export()
        .expect("export should succeed")
        .expect("workbook should exist");
    let table = decode_sheet(&bytes, SHEET_NAME)
        .expect("workbook should decode")
        .expect("sheet should exist");
    assert_eq!(table.header, COLUMNS.map(String::from).to_vec());
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].len(), 6);
    assert!(table.rows[0].iter().all(|cell| !cell.is_empty()));
}

#[test]
fn test_rewrite_reorders_without_new_ids() {
    let dir = tempdir().expect("tempdir should be created");
    let mut ledger = LedgerStore::new(FileStore::open(dir.path()).expect("store should open"));

    let commit = ledger
        .append_commit(vec![
            candidate("One", "1", 1),
            candidate("Two", "2", 2),
            candidate("Three", "3", 3),
        ])
        .expect("commit should succeed");

    let mut reordered = commit.receipts.clone();
    reordered.reverse();
    ledger.rewrite_all(&reordered).expect("rewrite should succeed");

    let loaded = ledger.load().expect("load should succeed");
    assert_eq!(loaded.receipts, reordered);
}

#[test]
fn test_legacy_ledger_upgraded_on_disk() {
    let dir = tempdir().expect("tempdir should be created");
    let mut store = FileStore::open(dir.path()).expect("store should open");

    let legacy = Table::new(COLUMNS[..5].iter().map(|c| c.to_string()).collect()).with_rows(vec![
        vec![
            "Supplier B".to_string(),
            "SC002".to_string(),
            "4.5".to_string(),
            "28/02/2023".to_string(),
            "28/02/2023, 07:45:00".to_string(),
        ],
    ]);
    let bytes = encode_sheet(SHEET_NAME, &legacy).expect("encode should succeed");
    store
        .set(WORKBOOK_KEY, &encode_base64(&bytes))
        .expect("set should succeed");

    let mut ledger = LedgerStore::new(store);
    ledger
        .append_commit(vec![candidate("Supplier A", "1", 5)])
        .expect("commit should succeed");

    let bytes = ledger
        .export()
        .expect("export should succeed")
        .expect("workbook should exist");
    let table = decode_sheet(&bytes, SHEET_NAME)
        .expect("workbook should decode")
        .expect("sheet should exist");
    assert_eq!(table.header.last().map(String::as_str), Some("UUID"));
    assert_eq!(table.rows[0], legacy.rows[0]);
    assert_eq!(table.rows[1].len(), 6);
}

#[test]
fn test_corrupt_file_survives_commit_attempt() {
    let dir = tempdir().expect("tempdir should be created");
    let mut store = FileStore::open(dir.path()).expect("store should open");
    store
        .set(WORKBOOK_KEY, "definitely not a workbook")
        .expect("set should succeed");

    let mut ledger = LedgerStore::new(store);
    let err = ledger
        .append_commit(vec![candidate("A", "1", 1)])
        .expect_err("commit should fail");
    assert!(err.is_corrupt_ledger());

    let on_disk = fs::read_to_string(dir.path().join(WORKBOOK_KEY)).expect("file should exist");
    assert_eq!(on_disk, "definitely not a workbook");
}

#[test]
fn test_quota_rejection_keeps_prior_ledger() {
    let dir = tempdir().expect("tempdir should be created");
    let mut ledger = LedgerStore::new(FileStore::open(dir.path()).expect("store should open"));
    ledger
        .append_commit(vec![candidate("A", "1", 1)])
        .expect("commit should succeed");
    let before = fs::read_to_string(dir.path().join(WORKBOOK_KEY)).expect("file should exist");

    let mut ledger =
        LedgerStore::new(FileStore::open(dir.path()).expect("store should reopen").with_quota(16));
    let err = ledger
        .append_commit(vec![candidate("B", "2", 2)])
        .expect_err("commit should exceed quota");
    assert!(matches!(err, ReceivingError::StorageWrite(_)));

    let after = fs::read_to_string(dir.path().join(WORKBOOK_KEY)).expect("file should exist");
    assert_eq!(before, after);
    assert_eq!(ledger.load().expect("load should succeed").len(), 1);
}

#[test]
fn test_retry_after_lost_staging_save_does_not_duplicate() {
    let dir = tempdir().expect("tempdir should be created");
    let mut store = FileStore::open(dir.path()).expect("store should open");
    let mut state = SessionState::load(&mut store).expect("state should load");
    let today = NaiveDate::from_ymd_opt(2024, 3, 5).expect("valid date");
    state.add_draft(today).expect("draft should be added");
    state.add_draft(today).expect("draft should be added");

    assert_eq!(state.staging.reserve_ids(&mut UuidGenerator), 2);
    let staged = serde_json::to_string(&state.staging).expect("drafts should serialize");
    store.set(DRAFTS_KEY, &staged).expect("set should succeed");

    let first = {
        let mut failing = DraftsUnwritable(&mut store);
        let first = state
            .staging
            .commit_visible(&mut LedgerStore::new(&mut failing))
            .expect("commit should succeed");
        let committed = serde_json::to_string(&state.staging).expect("drafts should serialize");
        let err = failing
            .set(DRAFTS_KEY, &committed)
            .expect_err("staging save should fail");
        assert!(matches!(err, ReceivingError::StorageWrite(_)));
        first
    };
    assert_eq!(first.commit.appended, 2);

    // what survived on disk still holds the uncommitted drafts
    let text = store
        .get(DRAFTS_KEY)
        .expect("get should succeed")
        .expect("drafts should exist");
    let mut reloaded: Session = serde_json::from_str(&text).expect("drafts should parse");
    assert!(reloaded.drafts().iter().all(|d| !d.state.is_committed()));

    let mut ledger = LedgerStore::new(&mut store);
    let retry = reloaded
        .commit_visible(&mut ledger)
        .expect("retry should succeed");
    assert_eq!(retry.commit.appended, 0);
    assert_eq!(retry.receipts(), first.receipts());
    assert_eq!(ledger.load().expect("load should succeed").len(), 2);
}

//! Table rows for text output.

use receiving_core::dates::format_date;
use receiving_core::{Draft, Receipt, Vocabulary};

pub const SCHEDULE_HEADERS: [&str; 6] = [
    "#",
    "Supplier",
    "Stock Code",
    "Mass (kg)",
    "Date",
    "Timestamp",
];

pub const DRAFT_HEADERS: [&str; 6] = [
    "Ref",
    "Supplier",
    "Stock Code",
    "Mass (kg)",
    "Date",
    "State",
];

/// Schedule rows, numbered from 1. Ids stay out of the table.
pub fn schedule_rows(receipts: &[Receipt]) -> Vec<Vec<String>> {
    receipts
        .iter()
        .enumerate()
        .map(|(index, r)| {
            vec![
                (index + 1).to_string(),
                r.supplier.clone(),
                r.stock_code.clone(),
                r.mass.to_string(),
                format_date(r.receipt_date),
                r.captured_at.clone(),
            ]
        })
        .collect()
}

pub fn draft_rows(drafts: &[Draft]) -> Vec<Vec<String>> {
    drafts
        .iter()
        .map(|d| {
            let mass = if d.mass.is_empty() { "-" } else { d.mass.as_str() };
            let state = if d.state.is_committed() {
                "committed"
            } else {
                "new"
            };
            vec![
                d.draft_ref.to_string(),
                d.supplier.clone(),
                d.stock_code.clone(),
                mass.to_string(),
                format_date(d.receipt_date),
                state.to_string(),
            ]
        })
        .collect()
}

pub fn vocabulary_rows(vocabulary: &Vocabulary) -> Vec<Vec<String>> {
    vocabulary
        .entries()
        .iter()
        .enumerate()
        .map(|(index, name)| vec![(index + 1).to_string(), name.clone()])
        .collect()
}

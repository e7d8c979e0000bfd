//! JSON output formatting.

use receiving_core::dates::format_date;
use receiving_core::{Draft, DraftState, Receipt, Vocabulary};

/// Convert a schedule row to JSON. `row` is 1-based.
pub fn receipt_json(row: usize, receipt: &Receipt) -> serde_json::Value {
    serde_json::json!({
        "row": row,
        "supplier": receipt.supplier,
        "stock_code": receipt.stock_code,
        "mass": receipt.mass,
        "date": format_date(receipt.receipt_date),
        "timestamp": receipt.captured_at,
        "id": receipt.id,
    })
}

pub fn receipts_json(receipts: &[Receipt]) -> Vec<serde_json::Value> {
    receipts
        .iter()
        .enumerate()
        .map(|(index, receipt)| receipt_json(index + 1, receipt))
        .collect()
}

pub fn draft_json(draft: &Draft) -> serde_json::Value {
    let (state, id) = match &draft.state {
        DraftState::Uncommitted => ("uncommitted", None),
        DraftState::Committed { id, .. } => ("committed", Some(id)),
    };
    serde_json::json!({
        "ref": draft.draft_ref,
        "supplier": draft.supplier,
        "stock_code": draft.stock_code,
        "mass": draft.mass,
        "date": format_date(draft.receipt_date),
        "state": state,
        "id": id,
    })
}

pub fn vocabulary_json(vocabulary: &Vocabulary) -> Vec<serde_json::Value> {
    vocabulary
        .entries()
        .iter()
        .enumerate()
        .map(|(index, name)| serde_json::json!({ "index": index + 1, "name": name }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use receiving_core::{Mass, ReceiptId};

    #[test]
    fn test_receipt_json_fields() {
        let receipt = Receipt {
            supplier: "Supplier A".to_string(),
            stock_code: "SC001".to_string(),
            mass: Mass::parse("").unwrap(),
            receipt_date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            captured_at: "05/03/2024, 10:00:00".to_string(),
            id: ReceiptId::parse("abc"),
        };
        let value = receipt_json(1, &receipt);
        assert_eq!(value["mass"], "0");
        assert_eq!(value["date"], "05/03/2024");
        assert_eq!(value["id"], "abc");
    }
}

//! Parsing helpers for command arguments.

use chrono::NaiveDate;

use receiving_core::dates::parse_display_date;
use receiving_core::{DraftUpdate, Vocabulary, VocabularyKind};

use crate::cli::RowFields;

/// Parse a date argument (yyyy-mm-dd or dd/mm/yyyy).
pub fn parse_date_arg(value: &str) -> anyhow::Result<NaiveDate> {
    parse_display_date(value).map_err(|_| {
        anyhow::anyhow!(
            "Invalid date: {} (expected yyyy-mm-dd or dd/mm/yyyy)",
            value
        )
    })
}

/// Convert a 1-based position as shown to the operator into an index.
pub fn position_to_index(position: usize) -> anyhow::Result<usize> {
    position
        .checked_sub(1)
        .ok_or_else(|| anyhow::anyhow!("Positions start at 1"))
}

/// Accept a name only if the list offers it.
pub fn choose_from(vocabulary: &Vocabulary, value: &str) -> anyhow::Result<String> {
    let value = value.trim();
    if vocabulary.contains(value) {
        return Ok(value.to_string());
    }

    let command = match vocabulary.kind() {
        VocabularyKind::Suppliers => "supplier",
        VocabularyKind::StockCodes => "stock-code",
    };
    Err(anyhow::anyhow!(
        "{} \"{}\" is not in the list.\nHint: Run `receiving {} add \"{}\"` first.",
        vocabulary.kind().label(),
        value,
        command,
        value
    ))
}

/// Build a field update from command flags, checking names against the lists.
pub fn row_update(
    fields: &RowFields,
    suppliers: &Vocabulary,
    stock_codes: &Vocabulary,
) -> anyhow::Result<DraftUpdate> {
    Ok(DraftUpdate {
        supplier: fields
            .supplier
            .as_deref()
            .map(|name| choose_from(suppliers, name))
            .transpose()?,
        stock_code: fields
            .stock_code
            .as_deref()
            .map(|code| choose_from(stock_codes, code))
            .transpose()?,
        mass: fields.mass.clone(),
        receipt_date: fields.date.as_deref().map(parse_date_arg).transpose()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suppliers() -> Vocabulary {
        Vocabulary::from_entries(
            VocabularyKind::Suppliers,
            vec!["Supplier A".to_string(), "Supplier B".to_string()],
        )
    }

    #[test]
    fn test_parse_date_arg_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(parse_date_arg("2024-03-05").unwrap(), expected);
        assert_eq!(parse_date_arg("05/03/2024").unwrap(), expected);
        assert!(parse_date_arg("March 5").is_err());
    }

    #[test]
    fn test_position_to_index() {
        assert_eq!(position_to_index(1).unwrap(), 0);
        assert!(position_to_index(0).is_err());
    }

    #[test]
    fn test_choose_from_rejects_unknown() {
        assert_eq!(choose_from(&suppliers(), " Supplier B ").unwrap(), "Supplier B");
        let err = choose_from(&suppliers(), "Acme").unwrap_err();
        assert!(err.to_string().contains("receiving supplier add"));
    }

    #[test]
    fn test_row_update_only_sets_given_fields() {
        let codes = Vocabulary::from_entries(VocabularyKind::StockCodes, vec!["SC001".to_string()]);
        let fields = RowFields {
            mass: Some("3".to_string()),
            ..RowFields::default()
        };
        let update = row_update(&fields, &suppliers(), &codes).unwrap();
        assert_eq!(update.mass.as_deref(), Some("3"));
        assert!(update.supplier.is_none());
        assert!(update.receipt_date.is_none());
    }
}

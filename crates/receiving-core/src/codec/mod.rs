//! Spreadsheet codec.
//!
//! Encodes a single text table as a minimal XLSX workbook and decodes it
//! back. Only what the receiving schedule needs is supported: one sheet of
//! text cells. Workbooks re-saved by a spreadsheet application are still
//! readable (shared strings, numeric and boolean cells are read as text).

mod read;
mod write;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

pub use read::{decode_sheet, sheet_names};
pub use write::encode_sheet;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("xml parse error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("xml attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("utf-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("missing workbook part: {0}")]
    MissingPart(String),
    #[error("invalid cell reference: {0}")]
    InvalidRef(String),
    #[error("invalid shared string index: {0}")]
    InvalidSharedString(String),
    #[error("cell text contains a character XML cannot carry (row {row}, column {column})")]
    InvalidText { row: usize, column: usize },
    #[error("base64 error: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// A header row followed by ordered data rows of text cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(header: Vec<String>) -> Self {
        Self {
            header,
            rows: Vec::new(),
        }
    }

    pub fn with_rows(mut self, rows: Vec<Vec<String>>) -> Self {
        self.rows = rows;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.rows.is_empty()
    }
}

/// Sheet bounds of the XLSX format (`XFD1048576`).
pub(crate) const MAX_ROWS: usize = 1_048_576;
pub(crate) const MAX_COLUMNS: usize = 16_384;

/// Wrap a workbook buffer as base64 text for the key-value store.
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Unwrap base64 text produced by [`encode_base64`].
pub fn decode_base64(text: &str) -> Result<Vec<u8>, CodecError> {
    Ok(STANDARD.decode(text.trim())?)
}

/// Convert a zero-based column index to spreadsheet letters (0 -> A, 26 -> AA).
pub(crate) fn column_letters(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// Split an A1-style reference into zero-based (row, column).
pub(crate) fn parse_cell_ref(reference: &str) -> Result<(usize, usize), CodecError> {
    let split = reference
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(|| CodecError::InvalidRef(reference.to_string()))?;
    let (letters, digits) = reference.split_at(split);
    if letters.is_empty() || !letters.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(CodecError::InvalidRef(reference.to_string()));
    }

    let invalid = || CodecError::InvalidRef(reference.to_string());
    let column = letters
        .bytes()
        .try_fold(0usize, |acc, b| {
            acc.checked_mul(26)?.checked_add((b - b'A') as usize + 1)
        })
        .filter(|column| *column <= MAX_COLUMNS)
        .ok_or_else(invalid)?;
    let row: usize = digits.parse().map_err(|_| invalid())?;
    if row == 0 || row > MAX_ROWS {
        return Err(invalid());
    }
    Ok((row - 1, column - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letters(0), "A");
        assert_eq!(column_letters(5), "F");
        assert_eq!(column_letters(25), "Z");
        assert_eq!(column_letters(26), "AA");
        assert_eq!(column_letters(701), "ZZ");
        assert_eq!(column_letters(702), "AAA");
    }

    #[test]
    fn test_parse_cell_ref() {
        assert_eq!(parse_cell_ref("A1").unwrap(), (0, 0));
        assert_eq!(parse_cell_ref("F12").unwrap(), (11, 5));
        assert_eq!(parse_cell_ref("AA3").unwrap(), (2, 26));
        assert!(parse_cell_ref("12").is_err());
        assert!(parse_cell_ref("B0").is_err());
        assert!(parse_cell_ref("b2").is_err());
    }

    #[test]
    fn test_parse_cell_ref_bounds() {
        assert_eq!(parse_cell_ref("XFD1048576").unwrap(), (MAX_ROWS - 1, MAX_COLUMNS - 1));
        assert!(matches!(parse_cell_ref("XFE1"), Err(CodecError::InvalidRef(_))));
        assert!(matches!(parse_cell_ref("A1048577"), Err(CodecError::InvalidRef(_))));
        assert!(matches!(
            parse_cell_ref("ZZZZZZZZZZZZZZZZ1"),
            Err(CodecError::InvalidRef(_))
        ));
        assert!(matches!(
            parse_cell_ref("A99999999999999999999999"),
            Err(CodecError::InvalidRef(_))
        ));
    }

    #[test]
    fn test_round_trip_preserves_text() {
        let table = Table::new(text_row(&["Supplier", "Stock Code", "Mass (kg)"])).with_rows(vec![
            text_row(&["Acme & Sons", "SC<001>", "12.50"]),
            text_row(&["  padded  ", "", "0"]),
            text_row(&["Café \"Ünïcode\"", "SC'002", "3"]),
        ]);

        let bytes = encode_sheet("Receiving Schedule", &table).unwrap();
        let decoded = decode_sheet(&bytes, "Receiving Schedule").unwrap().unwrap();
        assert_eq!(decoded, table);
    }

    #[test]
    fn test_round_trip_ragged_rows() {
        let table = Table::new(text_row(&["A", "B", "C", "D", "E"]))
            .with_rows(vec![text_row(&["1", "2", "3", "4", "5"]), text_row(&["x"]), vec![]]);

        let bytes = encode_sheet("Sheet", &table).unwrap();
        let decoded = decode_sheet(&bytes, "Sheet").unwrap().unwrap();
        assert_eq!(decoded, table);
    }

    #[test]
    fn test_round_trip_header_only() {
        let table = Table::new(text_row(&["Supplier", "UUID"]));
        let bytes = encode_sheet("Receiving Schedule", &table).unwrap();
        let decoded = decode_sheet(&bytes, "Receiving Schedule").unwrap().unwrap();
        assert_eq!(decoded, table);
    }

    #[test]
    fn test_missing_sheet_is_none() {
        let table = Table::new(text_row(&["A"]));
        let bytes = encode_sheet("Other", &table).unwrap();
        assert!(decode_sheet(&bytes, "Receiving Schedule").unwrap().is_none());
        assert_eq!(sheet_names(&bytes).unwrap(), vec!["Other".to_string()]);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(decode_sheet(b"definitely not a zip", "Receiving Schedule").is_err());
    }

    #[test]
    fn test_encode_rejects_control_characters() {
        let table = Table::new(text_row(&["A"])).with_rows(vec![text_row(&["bad\u{1}"])]);
        let err = encode_sheet("Sheet", &table).unwrap_err();
        assert!(matches!(err, CodecError::InvalidText { row: 1, column: 0 }));
    }

    #[test]
    fn test_base64_round_trip() {
        let bytes = vec![0u8, 159, 146, 150, 255];
        let text = encode_base64(&bytes);
        assert_eq!(decode_base64(&text).unwrap(), bytes);
        assert!(decode_base64("***").is_err());
    }
}

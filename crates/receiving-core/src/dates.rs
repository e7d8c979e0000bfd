//! Date conversions between the calendar type, the `dd/mm/yyyy` text stored
//! in the workbook and the ISO `yyyy-mm-dd` form used by input fields.

use chrono::NaiveDate;

use crate::error::{ReceivingError, Result};

const DISPLAY_FORMAT: &str = "%d/%m/%Y";
const INPUT_FORMAT: &str = "%Y-%m-%d";

/// Format a receipt date as `dd/mm/yyyy`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

/// Parse `dd/mm/yyyy` text back into a date.
///
/// ISO `yyyy-mm-dd` text is accepted too, since hand-edited workbooks
/// sometimes carry it.
pub fn parse_display_date(value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, DISPLAY_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(value, INPUT_FORMAT))
        .map_err(|_| {
            ReceivingError::Validation(format!(
                "Invalid date (expected dd/mm/yyyy): {}",
                value
            ))
        })
}

/// Parse an input-field date (`yyyy-mm-dd`).
pub fn parse_input_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), INPUT_FORMAT).map_err(|_| {
        ReceivingError::Validation(format!("Invalid date (expected YYYY-MM-DD): {}", value))
    })
}

/// Convert `dd/mm/yyyy` text to `yyyy-mm-dd` for an input field.
///
/// Text in any other shape is returned unchanged.
pub fn format_date_for_input(value: &str) -> String {
    let parts: Vec<&str> = value.split('/').collect();
    match parts.as_slice() {
        [day, month, year] => format!("{}-{}-{}", year, month, day),
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_format_date_pads() {
        assert_eq!(format_date(date(2024, 3, 5)), "05/03/2024");
    }

    #[test]
    fn test_display_date_inverse() {
        let original = date(2024, 3, 5);
        let parsed = parse_display_date(&format_date(original)).unwrap();
        assert_eq!(parsed, original);
        assert_eq!(format_date_for_input("05/03/2024"), "2024-03-05");
    }

    #[test]
    fn test_parse_display_accepts_iso() {
        assert_eq!(parse_display_date("2024-03-05").unwrap(), date(2024, 3, 5));
    }

    #[test]
    fn test_parse_display_rejects_garbage() {
        assert!(parse_display_date("March 5th").is_err());
        assert!(parse_display_date("31/02/2024").is_err());
    }

    #[test]
    fn test_format_for_input_passthrough() {
        assert_eq!(format_date_for_input("2024-03-05"), "2024-03-05");
        assert_eq!(format_date_for_input(""), "");
    }

    #[test]
    fn test_parse_input_date() {
        assert_eq!(parse_input_date("2024-12-31").unwrap(), date(2024, 12, 31));
        assert!(parse_input_date("31/12/2024").is_err());
    }
}

//! Receipt records and the ledger's column schema.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::{format_date, parse_display_date};
use crate::error::{ReceivingError, Result};
use crate::identity::ReceiptId;

/// Name of the worksheet holding the ledger.
pub const SHEET_NAME: &str = "Receiving Schedule";

/// Ledger columns, in order.
pub const COLUMNS: [&str; 6] = [
    "Supplier",
    "Stock Code",
    "Mass (kg)",
    "Date",
    "Timestamp",
    "UUID",
];

/// Column count of ledgers written before the UUID column existed.
pub const LEGACY_COLUMN_COUNT: usize = 5;

/// Delivered mass in kilograms, kept as the text the operator entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mass(String);

impl Mass {
    /// Parse mass text. Blank text is the literal zero `"0"`.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(Self::zero());
        }
        match value.parse::<f64>() {
            Ok(number) if number.is_finite() && number >= 0.0 => Ok(Self(value.to_string())),
            _ => Err(ReceivingError::Validation(format!(
                "Mass must be a non-negative number: {}",
                value
            ))),
        }
    }

    pub fn zero() -> Self {
        Self("0".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Mass {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Mass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A receipt as stored in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub supplier: String,
    pub stock_code: String,
    pub mass: Mass,
    pub receipt_date: NaiveDate,

    /// Capture timestamp text, assigned once at first commit
    pub captured_at: String,

    /// `None` only for rows logged before the UUID column existed
    pub id: Option<ReceiptId>,
}

impl Receipt {
    /// Render as one ledger row in [`COLUMNS`] order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.supplier.clone(),
            self.stock_code.clone(),
            self.mass.to_string(),
            format_date(self.receipt_date),
            self.captured_at.clone(),
            self.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
        ]
    }

    /// Parse one ledger row. Missing trailing cells read as empty.
    ///
    /// `line` is the 1-based sheet row, used in error messages.
    pub fn from_row(row: &[String], line: usize) -> Result<Self> {
        let cell = |index: usize| row.get(index).map(String::as_str).unwrap_or("");

        let mass = Mass::parse(cell(2))
            .map_err(|e| ReceivingError::CorruptLedger(format!("row {}: {}", line, e)))?;
        let receipt_date = parse_display_date(cell(3))
            .map_err(|e| ReceivingError::CorruptLedger(format!("row {}: {}", line, e)))?;

        Ok(Self {
            supplier: cell(0).to_string(),
            stock_code: cell(1).to_string(),
            mass,
            receipt_date,
            captured_at: cell(4).to_string(),
            id: ReceiptId::parse(cell(5)),
        })
    }

    /// Check the fields every stored receipt must carry.
    pub fn validate(&self) -> Result<()> {
        require_text("Supplier", &self.supplier)?;
        require_text("Stock code", &self.stock_code)
    }
}

/// A receipt offered for commit.
///
/// Drafts that were committed before carry their identity along so the
/// ledger reuses it instead of minting a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReceipt {
    pub supplier: String,
    pub stock_code: String,
    pub mass: Mass,
    pub receipt_date: NaiveDate,
    pub id: Option<ReceiptId>,
    pub captured_at: Option<String>,
}

impl NewReceipt {
    pub fn new(
        supplier: impl Into<String>,
        stock_code: impl Into<String>,
        mass: Mass,
        receipt_date: NaiveDate,
    ) -> Self {
        Self {
            supplier: supplier.into(),
            stock_code: stock_code.into(),
            mass,
            receipt_date,
            id: None,
            captured_at: None,
        }
    }

    pub fn with_identity(mut self, id: ReceiptId, captured_at: impl Into<String>) -> Self {
        self.id = Some(id);
        self.captured_at = Some(captured_at.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        require_text("Supplier", &self.supplier)?;
        require_text("Stock code", &self.stock_code)
    }
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ReceivingError::Validation(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(())
}

/// The ledger header row.
pub fn header_row() -> Vec<String> {
    COLUMNS.iter().map(|c| c.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_mass_defaults_and_validation() {
        assert_eq!(Mass::parse("").unwrap().as_str(), "0");
        assert_eq!(Mass::parse("  ").unwrap(), Mass::zero());
        assert_eq!(Mass::parse("12.50").unwrap().as_str(), "12.50");
        assert!(Mass::parse("-1").is_err());
        assert!(Mass::parse("heavy").is_err());
        assert!(Mass::parse("NaN").is_err());
        assert!(Mass::parse("inf").is_err());
    }

    #[test]
    fn test_receipt_row_round_trip() {
        let receipt = Receipt {
            supplier: "Supplier A".to_string(),
            stock_code: "SC001".to_string(),
            mass: Mass::parse("25").unwrap(),
            receipt_date: date(2024, 3, 5),
            captured_at: "05/03/2024, 09:15:00".to_string(),
            id: ReceiptId::parse("abc-123"),
        };
        let row = receipt.to_row();
        assert_eq!(row[3], "05/03/2024");
        assert_eq!(row[5], "abc-123");
        assert_eq!(Receipt::from_row(&row, 2).unwrap(), receipt);
    }

    #[test]
    fn test_legacy_row_has_no_id() {
        let row: Vec<String> = ["Supplier B", "SC002", "3", "01/01/2023", "01/01/2023, 08:00:00"]
            .iter()
            .map(|c| c.to_string())
            .collect();
        let receipt = Receipt::from_row(&row, 2).unwrap();
        assert!(receipt.id.is_none());
        assert_eq!(receipt.to_row()[5], "");
    }

    #[test]
    fn test_bad_date_is_corrupt() {
        let row = vec![
            "S".to_string(),
            "C".to_string(),
            "1".to_string(),
            "yesterday".to_string(),
        ];
        let err = Receipt::from_row(&row, 7).unwrap_err();
        assert!(err.is_corrupt_ledger());
        assert!(err.to_string().contains("row 7"));
    }

    #[test]
    fn test_validate_requires_supplier() {
        let candidate = NewReceipt::new("", "SC001", Mass::zero(), date(2024, 1, 1));
        assert!(candidate.validate().is_err());
    }
}

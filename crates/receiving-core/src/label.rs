//! Label payloads and batch rendering.
//!
//! Each committed receipt gets one 100 x 75 mm label whose QR code carries
//! a [`LabelPayload`] as JSON. Other tools scan and parse that payload, so
//! its field names are a wire contract.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dates::format_date;
use crate::error::{ReceivingError, Result};
use crate::receipt::Receipt;

/// Material type printed on every label.
pub const LABEL_TYPE: &str = "Raw";

pub const LABEL_WIDTH_MM: u32 = 100;
pub const LABEL_HEIGHT_MM: u32 = 75;

/// JSON object embedded in a label's QR code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelPayload {
    pub supplier: String,
    pub stock_code: String,
    pub mass: String,

    /// `dd/mm/yyyy`
    pub date: String,

    #[serde(rename = "type")]
    pub kind: String,
    pub uuid: String,
}

impl LabelPayload {
    /// Build the payload for a committed receipt.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a receipt without an id.
    pub fn from_receipt(receipt: &Receipt) -> Result<Self> {
        let id = receipt.id.as_ref().ok_or_else(|| {
            ReceivingError::Validation(format!(
                "Receipt from {} on {} has no id to label",
                receipt.supplier,
                format_date(receipt.receipt_date)
            ))
        })?;

        Ok(Self {
            supplier: receipt.supplier.clone(),
            stock_code: receipt.stock_code.clone(),
            mass: receipt.mass.to_string(),
            date: format_date(receipt.receipt_date),
            kind: LABEL_TYPE.to_string(),
            uuid: id.to_string(),
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Turns one payload into a printable artifact.
pub trait LabelRenderer {
    type Artifact;

    fn render(&mut self, payload: &LabelPayload) -> Result<Self::Artifact>;
}

/// All labels of one commit, in receipt order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelBatch<A> {
    /// File stem for the assembled document
    pub document_name: String,
    pub labels: Vec<A>,
}

impl LabelBatch<String> {
    /// One payload per line.
    pub fn to_json_lines(&self) -> String {
        let mut out = String::new();
        for label in &self.labels {
            out.push_str(label);
            out.push('\n');
        }
        out
    }
}

/// Render every receipt strictly in order.
///
/// Either every label is rendered or the first failure is returned; a
/// batch with fewer labels than receipts is never produced.
pub fn render_batch<R: LabelRenderer>(
    renderer: &mut R,
    receipts: &[Receipt],
) -> Result<LabelBatch<R::Artifact>> {
    let first = receipts.first().ok_or(ReceivingError::EmptySubmission)?;
    let document_name = label_document_name(first);

    let mut labels = Vec::with_capacity(receipts.len());
    for receipt in receipts {
        let payload = LabelPayload::from_receipt(receipt)?;
        labels.push(renderer.render(&payload)?);
        debug!(uuid = %payload.uuid, "rendered label");
    }

    Ok(LabelBatch {
        document_name,
        labels,
    })
}

/// `{supplier}_{dd-mm-yyyy}` for the first receipt of a batch, with
/// characters that are invalid in file names replaced by `_`.
pub fn label_document_name(receipt: &Receipt) -> String {
    let supplier: String = receipt
        .supplier
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            other => other,
        })
        .collect();
    let date = format_date(receipt.receipt_date).replace('/', "-");
    format!("{}_{}", supplier, date)
}

/// Renders each label as its JSON payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLabelRenderer;

impl LabelRenderer for JsonLabelRenderer {
    type Artifact = String;

    fn render(&mut self, payload: &LabelPayload) -> Result<String> {
        payload.to_json()
    }
}

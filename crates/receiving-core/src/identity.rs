//! Receipt identifiers.
//!
//! Identifiers are opaque text. Fresh ones are random (UUID v4) so no
//! coordination is needed between browsers, devices or sessions; ids read
//! back from an imported workbook are kept verbatim whatever their shape.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque unique identifier of a committed receipt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReceiptId(String);

impl ReceiptId {
    /// Wrap existing identifier text, returning `None` for blank text.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReceiptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of fresh receipt identifiers.
pub trait IdGenerator {
    fn next_id(&mut self) -> ReceiptId;
}

/// Random UUID v4 identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> ReceiptId {
        ReceiptId(Uuid::new_v4().to_string())
    }
}

/// Predictable identifiers (`<prefix>-1`, `<prefix>-2`, ...) for tests.
#[derive(Debug, Clone)]
pub struct SequentialGenerator {
    prefix: String,
    next: u64,
}

impl SequentialGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdGenerator for SequentialGenerator {
    fn next_id(&mut self) -> ReceiptId {
        let id = ReceiptId(format!("{}-{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}

//! Data model for extracted delivery-receipt line items.

use serde::{Deserialize, Serialize};

/// Which extraction grammar produced a raw line item.
///
/// Different invoice export layouts place the quantity token before or after
/// the description; both grammars are always applied and the results merged
/// under an explicit [`MergePolicy`](crate::extract::MergePolicy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grammar {
    /// Quantity-first layout: `2.00 <description> 45,000.00 ...`
    QuantityFirst,
    /// Reversed layout: description line, amount triple, then a standalone
    /// quantity on the following line.
    ReversedLayout,
}

/// An as-found match from one of the two grammars.
///
/// The quantity is kept as the extracted decimal token (`"2.00"`); it only
/// becomes an integer during aggregation, where a malformed token fails the
/// whole batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLineItem {
    /// Quantity token as matched (may contain a decimal point).
    pub quantity: String,

    /// Raw description text, before any cleaning.
    pub description: String,

    /// Grammar that produced this match.
    pub grammar: Grammar,
}

impl RawLineItem {
    pub fn new(quantity: impl Into<String>, description: impl Into<String>, grammar: Grammar) -> Self {
        Self {
            quantity: quantity.into(),
            description: description.into(),
            grammar,
        }
    }
}

/// The canonical unit after normalization and aggregation.
///
/// For a given extraction run there is at most one record per distinct model
/// string, and the model string is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Aggregated unit count.
    pub quantity: u32,

    /// Canonical model name (cleaned, corrected, aggregation key).
    pub model: String,

    /// Serial/IMEI numbers attached by the caller, one per unit.
    ///
    /// Not produced by extraction itself; filled in by
    /// [`ImeiAssociator::attach`](crate::serials::ImeiAssociator::attach)
    /// when the caller supplies them. Never persisted by this crate.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub serials: Vec<String>,
}

impl ProductRecord {
    pub fn new(quantity: u32, model: impl Into<String>) -> Self {
        Self {
            quantity,
            model: model.into(),
            serials: Vec::new(),
        }
    }
}

/// The externally consumed artifact of an extraction run.
///
/// Items are sorted ascending by model name (case-sensitive). Client and
/// invoice number are empty strings when their labels were absent from the
/// document; that is not an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Client name following the `Cliente:` label.
    pub client: String,

    /// Invoice number following the `No Factura` label.
    pub invoice_number: String,

    /// Aggregated line items, one per canonical model.
    pub items: Vec<ProductRecord>,

    /// Non-fatal issues encountered during extraction.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ExtractionResult {
    /// Total unit count across all records.
    pub fn total_units(&self) -> u64 {
        self.items.iter().map(|r| u64::from(r.quantity)).sum()
    }

    /// Whether any line items were recovered.
    pub fn has_items(&self) -> bool {
        !self.items.is_empty()
    }
}

/// A free-text serial/IMEI list attached to one model.
///
/// Owned by the caller and keyed by model string; lifetime is tied to a
/// single session or document, never persisted by the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImeiAssociation {
    /// Model the serials belong to (must match a record's model string).
    pub model: String,

    /// Discrete serial tokens, in paste order.
    pub serials: Vec<String>,
}

impl ImeiAssociation {
    pub fn new(model: impl Into<String>, serials: Vec<String>) -> Self {
        Self {
            model: model.into(),
            serials,
        }
    }
}

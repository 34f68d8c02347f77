//! Rule-based field extractors for sales invoices.

pub mod items;
pub mod metadata;
pub mod patterns;

pub use items::{LineItemExtractor, MergePolicy, QuantityFirstExtractor, ReversedExtractor};
pub use metadata::{extract_client, extract_invoice_number, ClientExtractor, InvoiceNumberExtractor};
pub use patterns::*;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

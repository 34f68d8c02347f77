//! Core library for delivery-receipt extraction from sales invoices.
//!
//! This crate provides:
//! - PDF text extraction (lopdf + pdf-extract)
//! - Rule-based extraction of client, invoice number and line items
//! - Model-name cleaning with learned corrections
//! - Per-model aggregation into delivery-receipt records
//! - Serial/IMEI association for warranty receipts

pub mod aggregate;
pub mod error;
pub mod extract;
pub mod models;
pub mod normalize;
pub mod pdf;
pub mod serials;

pub use error::{ConduceError, Result};
pub use extract::{FieldExtractor, InvoicePipeline, LineItemExtractor, MergePolicy};
pub use models::{
    ConduceConfig, ExtractionResult, Grammar, ImeiAssociation, ProductRecord, RawLineItem,
};
pub use normalize::{CorrectionStore, ModelNormalizer};
pub use pdf::{PdfSource, TextExtractor};
pub use serials::{split_serials, ImeiAssociator, QuantityMode};

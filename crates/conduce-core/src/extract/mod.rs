//! Invoice field extraction module.

mod pipeline;
pub mod rules;

pub use pipeline::InvoicePipeline;
pub use rules::{FieldExtractor, LineItemExtractor, MergePolicy};

use crate::error::ExtractionError;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

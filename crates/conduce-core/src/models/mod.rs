//! Data structures shared across the extraction pipeline.

pub mod config;
pub mod record;

pub use config::{
    CleaningConfig, ConduceConfig, CorrectionsConfig, PdfConfig, SerialConfig,
};
pub use record::{
    ExtractionResult, Grammar, ImeiAssociation, ProductRecord, RawLineItem,
};

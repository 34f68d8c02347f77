//! Error types for the conduce-core library.

use thiserror::Error;

/// Main error type for the conduce library.
#[derive(Error, Debug)]
pub enum ConduceError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Line-item extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Correction store persistence error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to reading the source PDF.
///
/// All variants are fatal to the extraction call; a document that cannot be
/// opened is surfaced to the caller and never retried.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF document.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from the PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors related to line-item extraction and aggregation.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// A matched quantity token cannot be parsed as a non-negative integer.
    ///
    /// Fatal to the whole extraction call, never dropped per item.
    #[error("malformed quantity token: {token:?}")]
    MalformedQuantity { token: String },
}

/// Errors related to the learned-correction store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The persisted store could not be read.
    #[error("failed to read correction store: {0}")]
    Read(String),

    /// The persisted store could not be written.
    #[error("failed to write correction store: {0}")]
    Write(String),
}

/// Result type for the conduce library.
pub type Result<T> = std::result::Result<T, ConduceError>;

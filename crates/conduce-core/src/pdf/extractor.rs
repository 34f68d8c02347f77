//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::{debug, warn};

use super::{PdfSource, Result};
use crate::error::PdfError;
use crate::models::PdfConfig;

/// Text extractor for invoice PDFs.
///
/// Loads the document with lopdf for structural checks (page count,
/// encryption) and pulls text out with pdf-extract. Pages that yield no
/// text are kept as empty entries and logged rather than failing the
/// document, so line positions in the joined text stay stable.
pub struct TextExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
    config: PdfConfig,
}

impl TextExtractor {
    /// Create a new text extractor with default configuration.
    pub fn new() -> Self {
        Self::with_config(PdfConfig::default())
    }

    /// Create a new text extractor with the given configuration.
    pub fn with_config(config: PdfConfig) -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
            config,
        }
    }

    /// Extract per-page text, honoring the configured page limit.
    fn page_texts(&self) -> Result<Vec<String>> {
        if self.document.is_none() {
            return Err(PdfError::Parse("No document loaded".to_string()));
        }

        let mut pages = pdf_extract::extract_text_from_mem_by_pages(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;

        if self.config.max_pages > 0 && pages.len() > self.config.max_pages {
            debug!(
                "Truncating document from {} to {} pages",
                pages.len(),
                self.config.max_pages
            );
            pages.truncate(self.config.max_pages);
        }

        Ok(pages)
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfSource for TextExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // Save decrypted document to raw_data for pdf_extract
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_text(&self) -> Result<String> {
        if self.document.is_none() {
            return Err(PdfError::Parse("No document loaded".to_string()));
        }

        // Pages yielding no text contribute an empty string; the join
        // still emits their newline, so line positions stay stable.
        let text = match self.page_texts() {
            Ok(pages) => {
                for (idx, page_text) in pages.iter().enumerate() {
                    if page_text.trim().is_empty() {
                        warn!("Page {} yielded no text", idx + 1);
                    }
                }
                pages.join("\n")
            }
            Err(e) => {
                warn!("Per-page extraction failed ({}), falling back to whole-document pass", e);
                pdf_extract::extract_text_from_mem(&self.raw_data)
                    .map_err(|e| PdfError::TextExtraction(e.to_string()))?
            }
        };

        if text.trim().len() < self.config.min_text_length {
            return Err(PdfError::TextExtraction(
                "No text could be extracted from the document".to_string(),
            ));
        }

        Ok(text)
    }

    fn extract_page_text(&self, page: u32) -> Result<String> {
        let pages = self.page_texts()?;
        pages
            .get((page as usize).wrapping_sub(1))
            .cloned()
            .ok_or(PdfError::InvalidPage(page))
    }
}

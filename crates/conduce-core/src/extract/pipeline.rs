//! End-to-end extraction pipeline: raw invoice text to product records.

use std::time::Instant;

use tracing::{debug, info};

use super::rules::{extract_client, extract_invoice_number, LineItemExtractor, MergePolicy};
use super::Result;
use crate::aggregate::{aggregate_items, parse_quantity};
use crate::models::{ConduceConfig, ExtractionResult};
use crate::normalize::{CorrectionStore, ModelNormalizer};

/// Invoice extraction pipeline.
///
/// Runs metadata extraction, both line grammars, the cleaning passes, the
/// learned-correction lookup and per-model aggregation over a single
/// document's text. Output records are sorted by model name and unique
/// per model; total units are conserved across grouping.
pub struct InvoicePipeline {
    normalizer: ModelNormalizer,
    corrections: Option<CorrectionStore>,
    merge_policy: MergePolicy,
}

impl InvoicePipeline {
    /// Create a pipeline with bundled cleaning defaults, no correction
    /// store and the union merge policy.
    pub fn new() -> Self {
        Self {
            normalizer: ModelNormalizer::new(),
            corrections: None,
            merge_policy: MergePolicy::default(),
        }
    }

    /// Build a pipeline from a configuration, opening the correction
    /// store at the configured path.
    pub fn from_config(config: &ConduceConfig) -> crate::error::Result<Self> {
        let normalizer = ModelNormalizer::from_config(&config.cleaning)?;
        let corrections = CorrectionStore::open_file(&config.corrections.path);
        Ok(Self::new()
            .with_normalizer(normalizer)
            .with_corrections(corrections))
    }

    /// Set the model-name normalizer.
    pub fn with_normalizer(mut self, normalizer: ModelNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Set the learned-correction store.
    pub fn with_corrections(mut self, corrections: CorrectionStore) -> Self {
        self.corrections = Some(corrections);
        self
    }

    /// Set the line-item merge policy.
    pub fn with_merge_policy(mut self, policy: MergePolicy) -> Self {
        self.merge_policy = policy;
        self
    }

    /// Parse a document's text into an extraction result.
    ///
    /// Malformed quantity tokens fail the whole document; every other
    /// missing piece degrades to an empty field plus a warning.
    pub fn parse(&self, text: &str) -> Result<ExtractionResult> {
        let start = Instant::now();
        let mut warnings = Vec::new();

        info!("Parsing invoice from {} characters of text", text.len());

        let client = extract_client(text).unwrap_or_default();
        if client.is_empty() {
            warnings.push("Could not extract client name".to_string());
        }

        let invoice_number = extract_invoice_number(text).unwrap_or_default();
        if invoice_number.is_empty() {
            warnings.push("Could not extract invoice number".to_string());
        }

        let raw_items = LineItemExtractor::new()
            .with_policy(self.merge_policy)
            .extract(text);
        if raw_items.is_empty() {
            warnings.push(
                "No products were found automatically; they must be added manually".to_string(),
            );
        }

        let mut pairs = Vec::with_capacity(raw_items.len());
        for item in &raw_items {
            let quantity = parse_quantity(&item.quantity)?;
            let cleaned = self.normalizer.clean(&item.description);
            let model = match &self.corrections {
                Some(store) => store.correct(&cleaned).to_string(),
                None => cleaned,
            };
            pairs.push((quantity, model));
        }

        let items = aggregate_items(pairs);
        debug!(
            "Extracted {} product records from {} raw line items",
            items.len(),
            raw_items.len()
        );

        Ok(ExtractionResult {
            client,
            invoice_number,
            items,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}

impl Default for InvoicePipeline {
    fn default() -> Self {
        Self::new()
    }
}

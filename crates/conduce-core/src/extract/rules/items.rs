//! Line-item extraction from invoice body text.
//!
//! Two line grammars are in circulation. The quantity-first layout puts
//! the quantity at the start of the line with the description and amounts
//! after it. The reversed layout puts the description and amounts on one
//! line and the quantity alone on the next. Both grammars run on every
//! document and their matches are merged.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::patterns::{ITEM_QUANTITY_FIRST, ITEM_REVERSED};
use super::FieldExtractor;
use crate::models::record::{Grammar, RawLineItem};

/// How matches from both grammars are merged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Keep every match from both grammars, quantity-first matches first.
    #[default]
    Union,
    /// Drop matches whose (quantity, description) pair was already seen.
    DedupeExact,
}

/// Extractor for the quantity-first line grammar.
pub struct QuantityFirstExtractor;

impl FieldExtractor for QuantityFirstExtractor {
    type Output = RawLineItem;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        ITEM_QUANTITY_FIRST
            .captures_iter(text)
            .map(|caps| RawLineItem::new(&caps[1], &caps[2], Grammar::QuantityFirst))
            .collect()
    }
}

/// Extractor for the reversed line grammar.
///
/// The regex captures (description, quantity); the item is built with the
/// fields swapped back into quantity-first order.
pub struct ReversedExtractor;

impl FieldExtractor for ReversedExtractor {
    type Output = RawLineItem;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        ITEM_REVERSED
            .captures_iter(text)
            .map(|caps| RawLineItem::new(&caps[2], &caps[1], Grammar::ReversedLayout))
            .collect()
    }
}

/// Combined line-item extractor applying both grammars.
pub struct LineItemExtractor {
    policy: MergePolicy,
}

impl LineItemExtractor {
    /// Create an extractor with the default union merge policy.
    pub fn new() -> Self {
        Self {
            policy: MergePolicy::default(),
        }
    }

    /// Set the merge policy.
    pub fn with_policy(mut self, policy: MergePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Extract line items from invoice text.
    pub fn extract(&self, text: &str) -> Vec<RawLineItem> {
        let mut items = QuantityFirstExtractor.extract_all(text);
        let reversed = ReversedExtractor.extract_all(text);

        debug!(
            "Found {} quantity-first and {} reversed line items",
            items.len(),
            reversed.len()
        );

        items.extend(reversed);

        match self.policy {
            MergePolicy::Union => items,
            MergePolicy::DedupeExact => {
                let mut seen = HashSet::new();
                items
                    .into_iter()
                    .filter(|item| seen.insert((item.quantity.clone(), item.description.clone())))
                    .collect()
            }
        }
    }
}

impl Default for LineItemExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUANTITY_FIRST_DOC: &str = "\
2.00 iPhone 13 Pro Max Dorado 256GB       45,000.00
1.00 Samsung Galaxy A54 Negro 128GB       12,500.00
";

    const REVERSED_DOC: &str = "\
TELEFONO ZTE BLADE A54 1,000.00 0.00 1,000.00
  2.00
RADIO PORTATIL SONY 800.00 0.00 800.00
  1.00
";

    #[test]
    fn test_quantity_first_extraction() {
        let items = QuantityFirstExtractor.extract_all(QUANTITY_FIRST_DOC);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].quantity, "2.00");
        assert_eq!(items[0].description, "iPhone 13 Pro Max Dorado 256GB");
        assert_eq!(items[0].grammar, Grammar::QuantityFirst);
        assert_eq!(items[1].description, "Samsung Galaxy A54 Negro 128GB");
    }

    #[test]
    fn test_reversed_extraction_swaps_captures() {
        let items = ReversedExtractor.extract_all(REVERSED_DOC);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].quantity, "2.00");
        assert_eq!(items[0].description, "TELEFONO ZTE BLADE A54");
        assert_eq!(items[0].grammar, Grammar::ReversedLayout);
        assert_eq!(items[1].quantity, "1.00");
        assert_eq!(items[1].description, "RADIO PORTATIL SONY");
    }

    #[test]
    fn test_union_keeps_both_grammars() {
        let text = format!("{}{}", QUANTITY_FIRST_DOC, REVERSED_DOC);
        let items = LineItemExtractor::new().extract(&text);
        assert_eq!(items.len(), 4);
        // Quantity-first matches come before reversed matches
        assert_eq!(items[0].grammar, Grammar::QuantityFirst);
        assert_eq!(items[3].grammar, Grammar::ReversedLayout);
    }

    #[test]
    fn test_dedupe_exact_drops_repeated_pairs() {
        // Unindented quantity lines let the quantity-first grammar read
        // across the line break and report the pair the reversed grammar
        // already found.
        let text = "\
TELEFONO ZTE 1,000.00 0.00 1,000.00
2.00
TELEFONO ZTE 1,000.00 0.00 1,000.00
2.00
";
        let union = LineItemExtractor::new().extract(text);
        let deduped = LineItemExtractor::new()
            .with_policy(MergePolicy::DedupeExact)
            .extract(text);
        assert!(union.len() > 2);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].quantity, "2.00");
        assert_eq!(deduped[0].description, "TELEFONO ZTE");
    }

    #[test]
    fn test_no_items_in_plain_text() {
        let items = LineItemExtractor::new().extract("Sin productos en este texto.");
        assert!(items.is_empty());
    }
}

//! Serial/IMEI association for delivery receipts.
//!
//! Serial lists arrive as pasted text with mixed separators. They are
//! keyed by model name and joined onto extraction results; depending on
//! the configured mode the serial count can drive the record quantity.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::extract::rules::patterns::SERIAL_SEPARATOR;
use crate::models::{ExtractionResult, ImeiAssociation};

/// How an attached serial list interacts with a record's quantity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityMode {
    /// Quantity is taken as entered; serials are informational.
    #[default]
    Entered,
    /// Quantity is derived from the serial count, minimum 1.
    FromSerialCount,
}

/// Split a pasted serial list on runs of commas and whitespace.
pub fn split_serials(pasted: &str) -> Vec<String> {
    SERIAL_SEPARATOR
        .split(pasted)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Keeps serial lists per model and joins them onto extraction results.
pub struct ImeiAssociator {
    mode: QuantityMode,
    serials: BTreeMap<String, Vec<String>>,
}

impl ImeiAssociator {
    pub fn new(mode: QuantityMode) -> Self {
        Self {
            mode,
            serials: BTreeMap::new(),
        }
    }

    /// Build an associator from (model, pasted text) pairs.
    pub fn from_pasted<I, S>(mode: QuantityMode, entries: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String> + AsRef<str>,
    {
        let mut associator = Self::new(mode);
        for (model, pasted) in entries {
            associator.assign(model.into(), pasted.as_ref());
        }
        associator
    }

    pub fn mode(&self) -> QuantityMode {
        self.mode
    }

    /// Set the serial list for a model from pasted text. An empty list
    /// removes the entry. Returns the token count.
    pub fn assign(&mut self, model: impl Into<String>, pasted: &str) -> usize {
        let model = model.into();
        let tokens = split_serials(pasted);
        let count = tokens.len();

        if tokens.is_empty() {
            self.serials.remove(&model);
        } else {
            self.serials.insert(model, tokens);
        }

        count
    }

    pub fn serials_for(&self, model: &str) -> Option<&[String]> {
        self.serials.get(model).map(Vec::as_slice)
    }

    /// The quantity a record for `model` should carry, given the entered
    /// quantity.
    pub fn quantity_for(&self, model: &str, entered: u32) -> u32 {
        match self.mode {
            QuantityMode::Entered => entered,
            QuantityMode::FromSerialCount => self
                .serials
                .get(model)
                .map(|s| s.len().max(1) as u32)
                .unwrap_or(entered),
        }
    }

    /// Migrate a serial list when its model is renamed. Returns whether
    /// anything moved.
    pub fn rename(&mut self, old: &str, new: impl Into<String>) -> bool {
        match self.serials.remove(old) {
            Some(list) => {
                self.serials.insert(new.into(), list);
                true
            }
            None => false,
        }
    }

    /// Drop the serial list for a model. Returns whether one existed.
    pub fn remove(&mut self, model: &str) -> bool {
        self.serials.remove(model).is_some()
    }

    /// All associations, ordered by model name.
    pub fn associations(&self) -> Vec<ImeiAssociation> {
        self.serials
            .iter()
            .map(|(model, serials)| ImeiAssociation::new(model.clone(), serials.clone()))
            .collect()
    }

    /// Join the stored serial lists onto an extraction result by model
    /// key. In serial-count mode the quantity of matched records is
    /// overridden by the serial count.
    ///
    /// Returns the models that have serials but no matching record, so
    /// the caller can report them instead of losing them silently.
    pub fn attach(&self, result: &mut ExtractionResult) -> Vec<String> {
        let mut matched = 0usize;

        for record in result.items.iter_mut() {
            if let Some(serials) = self.serials.get(&record.model) {
                record.serials = serials.clone();
                if self.mode == QuantityMode::FromSerialCount {
                    record.quantity = serials.len().max(1) as u32;
                }
                matched += 1;
            }
        }

        debug!(
            "Attached serials to {} of {} records",
            matched,
            result.items.len()
        );

        self.serials
            .keys()
            .filter(|model| !result.items.iter().any(|r| &r.model == *model))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.serials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.serials.is_empty()
    }
}

impl Default for ImeiAssociator {
    fn default() -> Self {
        Self::new(QuantityMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductRecord;

    fn result_with(items: Vec<ProductRecord>) -> ExtractionResult {
        ExtractionResult {
            client: String::new(),
            invoice_number: String::new(),
            items,
            warnings: Vec::new(),
            processing_time_ms: 0,
        }
    }

    #[test]
    fn test_split_serials_mixed_separators() {
        let parts = split_serials("35891004, 35891005\n35891006 35891007,,  35891008");
        assert_eq!(parts.len(), 5);
        assert_eq!(parts[0], "35891004");
        assert_eq!(parts[4], "35891008");
    }

    #[test]
    fn test_split_serials_empty_input() {
        assert!(split_serials("").is_empty());
        assert!(split_serials("  \n, ,\n").is_empty());
    }

    #[test]
    fn test_assign_empty_removes_entry() {
        let mut assoc = ImeiAssociator::default();
        assoc.assign("X", "111 222");
        assert_eq!(assoc.len(), 1);
        assoc.assign("X", "   ");
        assert!(assoc.is_empty());
    }

    #[test]
    fn test_quantity_entered_mode_is_untouched() {
        let mut assoc = ImeiAssociator::new(QuantityMode::Entered);
        assoc.assign("X", "111 222 333");
        assert_eq!(assoc.quantity_for("X", 7), 7);
    }

    #[test]
    fn test_quantity_from_serial_count() {
        let mut assoc = ImeiAssociator::new(QuantityMode::FromSerialCount);
        assoc.assign("X", "111, 222, 333");
        assert_eq!(assoc.quantity_for("X", 7), 3);
        // No serial entry: entered quantity stands
        assert_eq!(assoc.quantity_for("Y", 7), 7);
    }

    #[test]
    fn test_attach_fills_serials_and_reports_unmatched() {
        let mut assoc = ImeiAssociator::new(QuantityMode::FromSerialCount);
        assoc.assign("iPhone 11 128GB", "111 222");
        assoc.assign("NO SUCH MODEL", "999");

        let mut result = result_with(vec![ProductRecord::new(5, "iPhone 11 128GB")]);
        let unmatched = assoc.attach(&mut result);

        assert_eq!(result.items[0].serials, vec!["111", "222"]);
        assert_eq!(result.items[0].quantity, 2);
        assert_eq!(unmatched, vec!["NO SUCH MODEL"]);
    }

    #[test]
    fn test_attach_entered_mode_keeps_quantity() {
        let mut assoc = ImeiAssociator::new(QuantityMode::Entered);
        assoc.assign("iPhone 11 128GB", "111 222");

        let mut result = result_with(vec![ProductRecord::new(5, "iPhone 11 128GB")]);
        let unmatched = assoc.attach(&mut result);

        assert_eq!(result.items[0].serials.len(), 2);
        assert_eq!(result.items[0].quantity, 5);
        assert!(unmatched.is_empty());
    }

    #[test]
    fn test_rename_migrates_serials() {
        let mut assoc = ImeiAssociator::default();
        assoc.assign("OLD NAME", "111");
        assert!(assoc.rename("OLD NAME", "NEW NAME"));
        assert!(assoc.serials_for("OLD NAME").is_none());
        assert_eq!(assoc.serials_for("NEW NAME").unwrap(), ["111"]);
        assert!(!assoc.rename("OLD NAME", "OTHER"));
    }

    #[test]
    fn test_associations_ordered_by_model() {
        let mut assoc = ImeiAssociator::default();
        assoc.assign("Zeta", "1");
        assoc.assign("Alpha", "2");
        let list = assoc.associations();
        assert_eq!(list[0].model, "Alpha");
        assert_eq!(list[1].model, "Zeta");
    }
}

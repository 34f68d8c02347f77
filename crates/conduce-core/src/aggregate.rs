//! Quantity parsing and per-model aggregation.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::ExtractionError;
use crate::models::ProductRecord;

/// Result type for aggregation operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Parse an invoice quantity token into a whole unit count.
///
/// Accepts both integer and decimal spellings ("3", "2.00", "2.50"); the
/// fractional part is truncated. Negative or non-numeric tokens are
/// malformed and fail the whole document.
pub fn parse_quantity(token: &str) -> Result<u32> {
    let trimmed = token.trim();

    let value = Decimal::from_str(trimmed).map_err(|_| ExtractionError::MalformedQuantity {
        token: token.to_string(),
    })?;

    if value.is_sign_negative() {
        return Err(ExtractionError::MalformedQuantity {
            token: token.to_string(),
        });
    }

    value
        .trunc()
        .to_u32()
        .ok_or_else(|| ExtractionError::MalformedQuantity {
            token: token.to_string(),
        })
}

/// Group (quantity, model) pairs by exact model string and sum quantities.
///
/// The map is ordered, so records come out in ascending, case-sensitive
/// model order with at most one record per model. Pairs whose model
/// cleaned down to the empty string are dropped.
pub fn aggregate_items<I>(items: I) -> Vec<ProductRecord>
where
    I: IntoIterator<Item = (u32, String)>,
{
    let mut groups: BTreeMap<String, u32> = BTreeMap::new();
    let mut dropped = 0usize;

    for (quantity, model) in items {
        if model.is_empty() {
            dropped += 1;
            continue;
        }
        let entry = groups.entry(model).or_insert(0);
        *entry = entry.saturating_add(quantity);
    }

    if dropped > 0 {
        debug!("Dropped {} items with empty model names", dropped);
    }

    groups
        .into_iter()
        .map(|(model, quantity)| ProductRecord::new(quantity, model))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity_decimal_and_integer() {
        assert_eq!(parse_quantity("2.00").unwrap(), 2);
        assert_eq!(parse_quantity("3").unwrap(), 3);
        assert_eq!(parse_quantity("10.00").unwrap(), 10);
    }

    #[test]
    fn test_parse_quantity_truncates() {
        assert_eq!(parse_quantity("2.50").unwrap(), 2);
        assert_eq!(parse_quantity("0.99").unwrap(), 0);
    }

    #[test]
    fn test_parse_quantity_rejects_garbage() {
        assert!(matches!(
            parse_quantity("dos"),
            Err(ExtractionError::MalformedQuantity { token }) if token == "dos"
        ));
        assert!(parse_quantity("").is_err());
        assert!(parse_quantity("-1.00").is_err());
    }

    #[test]
    fn test_aggregate_sums_per_model() {
        let items = vec![
            (2, "iPhone 11 128GB".to_string()),
            (1, "Samsung A14 64GB".to_string()),
            (3, "iPhone 11 128GB".to_string()),
        ];

        let records = aggregate_items(items);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].model, "Samsung A14 64GB");
        assert_eq!(records[0].quantity, 1);
        assert_eq!(records[1].model, "iPhone 11 128GB");
        assert_eq!(records[1].quantity, 5);
    }

    #[test]
    fn test_aggregate_is_ordered_and_unique() {
        let items = vec![
            (1, "b".to_string()),
            (1, "a".to_string()),
            (1, "B".to_string()),
            (1, "a".to_string()),
        ];

        let records = aggregate_items(items);
        let models: Vec<&str> = records.iter().map(|r| r.model.as_str()).collect();
        // Case-sensitive ascending order; "B" < "a" < "b" in byte order
        assert_eq!(models, vec!["B", "a", "b"]);
        assert_eq!(records[1].quantity, 2);
    }

    #[test]
    fn test_aggregate_drops_empty_models() {
        let items = vec![(5, String::new()), (1, "X".to_string())];
        let records = aggregate_items(items);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].model, "X");
    }

    #[test]
    fn test_aggregate_conserves_quantity() {
        let items = vec![
            (2, "A".to_string()),
            (3, "B".to_string()),
            (4, "A".to_string()),
        ];
        let total_in: u32 = items.iter().map(|(q, _)| q).sum();
        let records = aggregate_items(items);
        let total_out: u32 = records.iter().map(|r| r.quantity).sum();
        assert_eq!(total_in, total_out);
    }
}

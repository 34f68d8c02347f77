//! Common regex patterns for invoice extraction and model cleaning.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::config::default_colors;

lazy_static! {
    // Metadata patterns (Dominican invoice header)
    pub static ref CLIENT_NAME: Regex = Regex::new(
        r"(?is)Cliente:\s*(.*?)\s*(?:Dirección:|Vendedor:|\z)"
    ).unwrap();

    pub static ref INVOICE_NUMBER: Regex = Regex::new(
        r"(?i)No Factura\s*(\w+)"
    ).unwrap();

    // Line-item grammars. Quantity-first: "2.00 DESCRIPTION... 45,000.00".
    // The trailing amount marks the end of the description and is not
    // captured.
    pub static ref ITEM_QUANTITY_FIRST: Regex = Regex::new(
        r"(?m)^(\d+\.\d{2})\s+(.*?)\s+\d{1,3}(?:,?\d{3})*\.\d{2}"
    ).unwrap();

    // Reversed layout: description line carrying price, 0.00 discount and
    // total, followed by a line holding only the quantity.
    pub static ref ITEM_REVERSED: Regex = Regex::new(
        r"(?m)^(.+?)\s+\d{1,3}(?:,?\d{3})*\.\d{2}\s+0\.00\s+\d{1,3}(?:,?\d{3})*\.\d{2}\n\s*(\d+\.\d{2})\s*$"
    ).unwrap();

    // Cleaning passes, applied in order by the normalizer
    pub static ref NETWORK_SUFFIX: Regex = Regex::new(
        r"(?i)\s*5g\b"
    ).unwrap();

    pub static ref SCREEN_SIZE: Regex = Regex::new(
        r#"(?i)\s*\d+\.?\d*"+\s*$"#
    ).unwrap();

    pub static ref COLOR_WORDS: Regex = Regex::new(
        &color_word_pattern(&default_colors())
    ).unwrap();

    pub static ref EMPTY_PARENS: Regex = Regex::new(
        r"\(\s*\)"
    ).unwrap();

    // Manufacturer part codes (Motorola XT..., generic A...L, Samsung SM-...)
    pub static ref MOTOROLA_CODE: Regex = Regex::new(
        r"(?i)\s+XT\w+-\w+"
    ).unwrap();

    pub static ref VARIANT_CODE: Regex = Regex::new(
        r"(?i)\s+A\w+L\b"
    ).unwrap();

    pub static ref SAMSUNG_CODE: Regex = Regex::new(
        r"(?i)\s+SM-\w+\b"
    ).unwrap();

    pub static ref BLADE_WORD: Regex = Regex::new(
        r"(?i)\bBLADE\b"
    ).unwrap();

    pub static ref SERIES_CODE: Regex = Regex::new(
        r"(?i)\s+Z\d+\b"
    ).unwrap();

    // Everything after the storage token is dropped
    pub static ref STORAGE_CAPACITY: Regex = Regex::new(
        r"(?i)(\d+[GT]B)\b.*"
    ).unwrap();

    pub static ref MULTI_SPACE: Regex = Regex::new(
        r"\s{2,}"
    ).unwrap();

    // Serial/IMEI lists are pasted with mixed separators
    pub static ref SERIAL_SEPARATOR: Regex = Regex::new(
        r"[,\s]+"
    ).unwrap();
}

/// Build a whole-word alternation pattern for the given color tokens.
///
/// Tokens are escaped, so user-supplied entries cannot break the pattern.
/// Returns a never-matching pattern for an empty list.
pub fn color_word_pattern(colors: &[String]) -> String {
    if colors.is_empty() {
        // `\b\B` cannot match anywhere
        return r"\b\B".to_string();
    }

    let escaped: Vec<String> = colors.iter().map(|c| regex::escape(c)).collect();
    format!(r"(?i)\b({})\b", escaped.join("|"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_pattern_stops_at_address() {
        let caps = CLIENT_NAME
            .captures("Cliente: COMERCIAL XYZ SRL Dirección: Av. Duarte 45")
            .unwrap();
        assert_eq!(caps[1].trim(), "COMERCIAL XYZ SRL");
    }

    #[test]
    fn test_client_pattern_runs_to_end_without_markers() {
        let caps = CLIENT_NAME.captures("Cliente: JUAN PEREZ\n").unwrap();
        assert_eq!(caps[1].trim(), "JUAN PEREZ");
    }

    #[test]
    fn test_invoice_number_pattern() {
        let caps = INVOICE_NUMBER.captures("No Factura B0100000123").unwrap();
        assert_eq!(&caps[1], "B0100000123");
    }

    #[test]
    fn test_quantity_first_grammar() {
        let text = "2.00 iPhone 13 Pro Max Dorado 256GB       45,000.00";
        let caps = ITEM_QUANTITY_FIRST.captures(text).unwrap();
        assert_eq!(&caps[1], "2.00");
        assert_eq!(&caps[2], "iPhone 13 Pro Max Dorado 256GB");
    }

    #[test]
    fn test_quantity_first_stops_before_amount_with_thousands() {
        let text = "10.00 TELEVISOR LG 55 1,250,000.00 extra";
        let caps = ITEM_QUANTITY_FIRST.captures(text).unwrap();
        assert_eq!(&caps[2], "TELEVISOR LG 55");
    }

    #[test]
    fn test_reversed_grammar() {
        let text = "TELEFONO ZTE BLADE A54 1,000.00 0.00 1,000.00\n  3.00  ";
        let caps = ITEM_REVERSED.captures(text).unwrap();
        assert_eq!(&caps[1], "TELEFONO ZTE BLADE A54");
        assert_eq!(&caps[2], "3.00");
    }

    #[test]
    fn test_color_pattern_is_whole_word() {
        assert!(COLOR_WORDS.is_match("iPhone 13 Dorado 128GB"));
        assert!(!COLOR_WORDS.is_match("doradorama"));
    }

    #[test]
    fn test_empty_color_list_never_matches() {
        let re = Regex::new(&color_word_pattern(&[])).unwrap();
        assert!(!re.is_match("Dorado"));
        assert!(!re.is_match(""));
    }
}

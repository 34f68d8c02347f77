//! Client and invoice-number extraction from invoice header text.

use super::patterns::{CLIENT_NAME, INVOICE_NUMBER};
use super::FieldExtractor;

/// Client name extractor.
///
/// Matches the `Cliente:` label and captures everything up to the next
/// header field (`Dirección:` or `Vendedor:`) or the end of the text.
pub struct ClientExtractor;

impl ClientExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ClientExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for ClientExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        CLIENT_NAME
            .captures(text)
            .map(|caps| caps[1].trim().to_string())
            .filter(|name| !name.is_empty())
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        CLIENT_NAME
            .captures_iter(text)
            .map(|caps| caps[1].trim().to_string())
            .filter(|name| !name.is_empty())
            .collect()
    }
}

/// Invoice number extractor.
pub struct InvoiceNumberExtractor;

impl InvoiceNumberExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for InvoiceNumberExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for InvoiceNumberExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        INVOICE_NUMBER
            .captures(text)
            .map(|caps| caps[1].trim().to_string())
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        INVOICE_NUMBER
            .captures_iter(text)
            .map(|caps| caps[1].trim().to_string())
            .collect()
    }
}

/// Extract the client name from invoice text.
pub fn extract_client(text: &str) -> Option<String> {
    ClientExtractor::new().extract(text)
}

/// Extract the invoice number from invoice text.
pub fn extract_invoice_number(text: &str) -> Option<String> {
    InvoiceNumberExtractor::new().extract(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_client_multiline() {
        let text = "FERRETERIA EL SOL\nCliente: DISTRIBUIDORA\nNACIONAL SRL\nDirección: Calle 8 #12";
        assert_eq!(
            extract_client(text),
            Some("DISTRIBUIDORA\nNACIONAL SRL".to_string())
        );
    }

    #[test]
    fn test_extract_client_missing() {
        assert_eq!(extract_client("Factura sin encabezado"), None);
    }

    #[test]
    fn test_extract_client_stops_at_vendedor() {
        let text = "Cliente: JUAN PEREZ Vendedor: MARIA";
        assert_eq!(extract_client(text), Some("JUAN PEREZ".to_string()));
    }

    #[test]
    fn test_extract_invoice_number() {
        assert_eq!(
            extract_invoice_number("RNC 131223344 No Factura B0100000123 NCF"),
            Some("B0100000123".to_string())
        );
    }

    #[test]
    fn test_extract_invoice_number_case_insensitive() {
        assert_eq!(
            extract_invoice_number("no factura F-991"),
            Some("F".to_string())
        );
    }
}

//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::serials::QuantityMode;

/// Main configuration for the conduce pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConduceConfig {
    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Model-name cleaning configuration.
    pub cleaning: CleaningConfig,

    /// Learned-correction store configuration.
    pub corrections: CorrectionsConfig,

    /// Serial/IMEI handling configuration.
    pub serials: SerialConfig,
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum pages to extract text from (0 = unlimited).
    pub max_pages: usize,

    /// Minimum extracted length below which the document is reported as
    /// having no usable text.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_pages: 0,
            min_text_length: 1,
        }
    }
}

/// Configuration for the model-name cleaning pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Whole-word color tokens removed from descriptions, bilingual
    /// (Spanish and English). Bundled defaults plus user additions;
    /// matched case-insensitively, whole words only.
    pub colors_to_remove: Vec<String>,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            colors_to_remove: default_colors(),
        }
    }
}

/// Bundled color-token set carried over from the desktop tool.
pub fn default_colors() -> Vec<String> {
    [
        "negro", "rojo", "verde", "azul", "blanco", "gris", "plateado",
        "dorado", "púrpura", "morado", "lavanda", "rosa", "rosado",
        "amarillo", "naranja", "marrón", "cyan", "magenta", "grafito",
        "sierra", "black", "red", "green", "blue", "white", "gray",
        "silver", "gold", "purple", "pink", "yellow", "orange", "brown",
        "graphite", "midnight blue", "desert gold", "titanium", "oro",
        "arena", "pantone", "tapestry", "arabesque", "navy", "violet",
        "mint", "cream", "beige", "charcoal", "blaze", "pure", "tendril",
        "polar", "deep", "space", "rose",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Learned-correction store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectionsConfig {
    /// Path of the persisted correction file (flat JSON object mapping
    /// cleaned model name to corrected model name).
    pub path: PathBuf,
}

impl Default for CorrectionsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("corrections.json"),
        }
    }
}

/// Serial/IMEI handling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// How an attached serial list interacts with a record's quantity.
    pub quantity_mode: QuantityMode,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            quantity_mode: QuantityMode::Entered,
        }
    }
}

impl ConduceConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_colors_are_lowercase() {
        for color in default_colors() {
            assert_eq!(color, color.to_lowercase());
        }
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: ConduceConfig =
            serde_json::from_str(r#"{"cleaning": {"colors_to_remove": ["teal"]}}"#).unwrap();
        assert_eq!(config.cleaning.colors_to_remove, vec!["teal"]);
        assert_eq!(config.pdf.max_pages, 0);
        assert_eq!(config.serials.quantity_mode, QuantityMode::Entered);
    }
}

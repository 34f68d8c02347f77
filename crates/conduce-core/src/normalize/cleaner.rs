//! Model-name cleaning.
//!
//! Raw invoice descriptions carry colors, carrier codes, screen sizes and
//! other noise that must not reach the delivery receipt. Cleaning is an
//! ordered list of regex passes; the order matters (colors are removed
//! before emptied parentheses, storage truncation runs before whitespace
//! collapsing) and the whole pipeline is idempotent.

use regex::Regex;

use crate::error::{ConduceError, Result};
use crate::extract::rules::patterns::{
    color_word_pattern, BLADE_WORD, COLOR_WORDS, EMPTY_PARENS, MOTOROLA_CODE, MULTI_SPACE,
    NETWORK_SUFFIX, SAMSUNG_CODE, SCREEN_SIZE, SERIES_CODE, STORAGE_CAPACITY, VARIANT_CODE,
};
use crate::models::CleaningConfig;

/// Model-name normalizer.
#[derive(Debug, Clone)]
pub struct ModelNormalizer {
    color_words: Regex,
}

impl ModelNormalizer {
    /// Pass names in application order.
    pub const PASSES: &'static [&'static str] = &[
        "network-generation",
        "screen-size",
        "color-words",
        "empty-parens",
        "motorola-code",
        "variant-code",
        "samsung-code",
        "blade-word",
        "series-code",
        "storage-truncate",
        "whitespace",
    ];

    /// Create a normalizer with the bundled color set.
    pub fn new() -> Self {
        Self {
            color_words: COLOR_WORDS.clone(),
        }
    }

    /// Create a normalizer with a custom color set.
    pub fn with_colors(colors: &[String]) -> Result<Self> {
        let color_words = Regex::new(&color_word_pattern(colors))
            .map_err(|e| ConduceError::Config(format!("invalid color list: {}", e)))?;
        Ok(Self { color_words })
    }

    /// Create a normalizer from a cleaning configuration section.
    pub fn from_config(config: &CleaningConfig) -> Result<Self> {
        Self::with_colors(&config.colors_to_remove)
    }

    /// Run the full pass pipeline over a raw description.
    ///
    /// An empty result means the description was nothing but noise; such
    /// records are dropped by the aggregator, never kept blank.
    pub fn clean(&self, raw: &str) -> String {
        let mut model = raw.to_string();
        for pass in Self::PASSES {
            if let Some(next) = self.apply_pass(pass, &model) {
                model = next;
            }
        }
        model
    }

    /// Apply a single named pass. Returns `None` for an unknown name.
    pub fn apply_pass(&self, name: &str, input: &str) -> Option<String> {
        let output = match name {
            "network-generation" => NETWORK_SUFFIX.replace_all(input, "").into_owned(),
            "screen-size" => SCREEN_SIZE.replace_all(input, "").into_owned(),
            "color-words" => self.color_words.replace_all(input, "").into_owned(),
            "empty-parens" => EMPTY_PARENS.replace_all(input, "").into_owned(),
            "motorola-code" => MOTOROLA_CODE.replace_all(input, "").into_owned(),
            "variant-code" => VARIANT_CODE.replace_all(input, "").into_owned(),
            "samsung-code" => SAMSUNG_CODE.replace_all(input, "").into_owned(),
            "blade-word" => BLADE_WORD.replace_all(input, "").into_owned(),
            "series-code" => SERIES_CODE.replace_all(input, "").into_owned(),
            "storage-truncate" => STORAGE_CAPACITY.replace_all(input, "$1").into_owned(),
            "whitespace" => MULTI_SPACE.replace_all(input, " ").trim().to_string(),
            _ => return None,
        };
        Some(output)
    }
}

impl Default for ModelNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

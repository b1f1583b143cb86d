use std::collections::BTreeMap;

use serde::Deserialize;

use super::LONG_VOWEL_MARK;

#[derive(Deserialize)]
struct PhonemeConfig {
    mappings: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, thiserror::Error)]
pub enum PhonemeTableError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("[mappings] table is empty")]
    Empty,
    #[error("grapheme must be 1 or 2 codepoints: {0:?}")]
    InvalidGrapheme(String),
    #[error("empty phoneme list for grapheme: {0}")]
    EmptyPhonemes(String),
    #[error("blank phoneme symbol for grapheme: {0}")]
    BlankPhoneme(String),
    #[error("phoneme table already initialized")]
    AlreadyInitialized,
}

/// Parse TOML text into a sorted `BTreeMap<grapheme, phonemes>`.
///
/// Only the long-vowel mark may map to an empty list; its phoneme is
/// resolved from context during tokenization.
pub fn parse_phoneme_toml(
    toml_str: &str,
) -> Result<BTreeMap<String, Vec<String>>, PhonemeTableError> {
    let config: PhonemeConfig =
        toml::from_str(toml_str).map_err(|e| PhonemeTableError::Parse(e.to_string()))?;

    if config.mappings.is_empty() {
        return Err(PhonemeTableError::Empty);
    }

    for (grapheme, phonemes) in &config.mappings {
        let len = grapheme.chars().count();
        if !(1..=2).contains(&len) {
            return Err(PhonemeTableError::InvalidGrapheme(grapheme.clone()));
        }
        let is_long_vowel_mark = grapheme.chars().eq([LONG_VOWEL_MARK]);
        if phonemes.is_empty() && !is_long_vowel_mark {
            return Err(PhonemeTableError::EmptyPhonemes(grapheme.clone()));
        }
        if phonemes.iter().any(|p| p.trim().is_empty()) {
            return Err(PhonemeTableError::BlankPhoneme(grapheme.clone()));
        }
    }

    Ok(config.mappings)
}

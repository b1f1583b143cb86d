use std::collections::HashMap;
use std::sync::OnceLock;

use super::config::{parse_phoneme_toml, PhonemeTableError};

pub const DEFAULT_TOML: &str = include_str!("default_phonemes.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Immutable grapheme → phoneme mapping.
///
/// Keys are one or two codepoints. Built once and shared read-only.
#[derive(Debug)]
pub struct PhonemeTable {
    entries: HashMap<String, Vec<String>>,
}

impl PhonemeTable {
    /// Set custom TOML before first `global()` call.
    pub fn init_custom(toml_content: String) -> Result<(), PhonemeTableError> {
        // Validate eagerly
        parse_phoneme_toml(&toml_content)?;
        CUSTOM_TOML
            .set(toml_content)
            .map_err(|_| PhonemeTableError::AlreadyInitialized)
    }

    /// Get or initialize the global singleton.
    pub fn global() -> &'static PhonemeTable {
        static INSTANCE: OnceLock<PhonemeTable> = OnceLock::new();
        INSTANCE.get_or_init(|| {
            let toml_str = CUSTOM_TOML
                .get()
                .map(|s| s.as_str())
                .unwrap_or(DEFAULT_TOML);
            PhonemeTable::from_toml(toml_str).expect("phoneme TOML must be valid")
        })
    }

    /// Build a standalone table, bypassing the global singleton.
    pub fn from_toml(toml_str: &str) -> Result<Self, PhonemeTableError> {
        let map = parse_phoneme_toml(toml_str)?;
        Ok(Self {
            entries: map.into_iter().collect(),
        })
    }

    pub fn lookup(&self, grapheme: &str) -> Option<&[String]> {
        self.entries.get(grapheme).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

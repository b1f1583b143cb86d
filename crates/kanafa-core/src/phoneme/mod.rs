//! Hiragana-to-phoneme mapping table.
//!
//! Loaded from an embedded TOML table of one- and two-codepoint graphemes
//! (the latter cover yōon such as きゃ), overridable before first use.

mod config;
mod table;

pub use config::{parse_phoneme_toml, PhonemeTableError};
pub use table::PhonemeTable;

/// Long-vowel mark. Maps to an empty list in the table; the tokenizer
/// resolves it against the preceding vowel.
pub const LONG_VOWEL_MARK: char = 'ー';

/// Returns the embedded default phoneme table TOML.
pub fn default_toml() -> &'static str {
    table::DEFAULT_TOML
}

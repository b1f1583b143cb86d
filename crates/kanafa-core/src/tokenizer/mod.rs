//! Hiragana tokenizer.
//!
//! Scans text left to right with longest-match-first lookup (two codepoints,
//! then one) against a [`PhonemeTable`], resolving the long-vowel mark
//! against the last emitted vowel. Never backtracks.


use std::fmt;

use serde::Serialize;
use tracing::{debug, debug_span};

use crate::phoneme::{PhonemeTable, LONG_VOWEL_MARK};

/// The five plain vowel phonemes that a long-vowel mark can extend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vowel {
    A,
    I,
    U,
    E,
    O,
}

impl Vowel {
    pub fn from_phoneme(phoneme: &str) -> Option<Self> {
        match phoneme {
            "a" => Some(Vowel::A),
            "i" => Some(Vowel::I),
            "u" => Some(Vowel::U),
            "e" => Some(Vowel::E),
            "o" => Some(Vowel::O),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Vowel::A => "a",
            Vowel::I => "i",
            Vowel::U => "u",
            Vowel::E => "e",
            Vowel::O => "o",
        }
    }
}

/// One tokenization step: the matched surface and its phonemes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphemeUnit {
    /// 1–2 hiragana codepoints
    pub surface: String,
    /// Empty only for an unresolved long-vowel mark
    pub phonemes: Vec<String>,
}

/// Grapheme units in input order plus their flattened phoneme sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Transcription {
    pub units: Vec<GraphemeUnit>,
    pub phonemes: Vec<String>,
}

impl Transcription {
    fn push(&mut self, unit: GraphemeUnit) {
        self.phonemes.extend(unit.phonemes.iter().cloned());
        self.units.push(unit);
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// Non-fatal tokenization issue, accumulated and returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TokenizeDiagnostic {
    /// Non-blank codepoint with no table entry. `offset` is a codepoint index.
    UnknownCharacter { ch: char, offset: usize },
}

impl fmt::Display for TokenizeDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenizeDiagnostic::UnknownCharacter { ch, offset } => {
                write!(f, "unknown character {ch:?} at offset {offset}")
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tokenized {
    pub transcription: Transcription,
    pub diagnostics: Vec<TokenizeDiagnostic>,
}

/// Outcome of inspecting the input at one position.
#[derive(Debug, PartialEq, Eq)]
enum Step {
    Emit { unit: GraphemeUnit, consumed: usize },
    Blank,
    Unknown(char),
}

/// Last-vowel transition after emitting `emitted`.
///
/// An empty list leaves the state unchanged; a non-empty list sets it to its
/// final phoneme when that is a plain vowel and clears it otherwise.
pub fn next_last_vowel(prev: Option<Vowel>, emitted: &[String]) -> Option<Vowel> {
    match emitted.last() {
        None => prev,
        Some(last) => Vowel::from_phoneme(last),
    }
}

pub struct Tokenizer<'a> {
    table: &'a PhonemeTable,
}

impl Tokenizer<'static> {
    /// Tokenizer over the global phoneme table.
    pub fn global() -> Self {
        Self::new(PhonemeTable::global())
    }
}

impl<'a> Tokenizer<'a> {
    pub fn new(table: &'a PhonemeTable) -> Self {
        Self { table }
    }

    pub fn tokenize(&self, text: &str) -> Tokenized {
        let chars: Vec<char> = text.chars().collect();
        let _span = debug_span!("tokenize", char_count = chars.len()).entered();

        let mut transcription = Transcription::default();
        let mut diagnostics = Vec::new();
        let mut last_vowel = None;
        let mut i = 0;

        while i < chars.len() {
            match self.step(&chars[i..], last_vowel) {
                Step::Emit { unit, consumed } => {
                    last_vowel = next_last_vowel(last_vowel, &unit.phonemes);
                    transcription.push(unit);
                    i += consumed;
                }
                Step::Blank => i += 1,
                Step::Unknown(ch) => {
                    debug!(?ch, offset = i, "unknown character");
                    diagnostics.push(TokenizeDiagnostic::UnknownCharacter { ch, offset: i });
                    i += 1;
                }
            }
        }

        debug!(
            unit_count = transcription.units.len(),
            phoneme_count = transcription.phonemes.len(),
            diagnostic_count = diagnostics.len()
        );
        Tokenized {
            transcription,
            diagnostics,
        }
    }

    /// Decide what the input starting at `rest[0]` produces. `rest` is non-empty.
    fn step(&self, rest: &[char], last_vowel: Option<Vowel>) -> Step {
        if rest.len() >= 2 {
            let pair: String = rest[..2].iter().collect();
            if let Some(phonemes) = self.table.lookup(&pair) {
                return Step::Emit {
                    unit: GraphemeUnit {
                        surface: pair,
                        phonemes: phonemes.to_vec(),
                    },
                    consumed: 2,
                };
            }
        }

        let ch = rest[0];
        if ch == LONG_VOWEL_MARK {
            if let Some(vowel) = last_vowel {
                return Step::Emit {
                    unit: GraphemeUnit {
                        surface: ch.to_string(),
                        phonemes: vec![vowel.as_str().to_string()],
                    },
                    consumed: 1,
                };
            }
        }

        let mut buf = [0u8; 4];
        let single: &str = ch.encode_utf8(&mut buf);
        match self.table.lookup(single) {
            Some(phonemes) => Step::Emit {
                unit: GraphemeUnit {
                    surface: single.to_string(),
                    phonemes: phonemes.to_vec(),
                },
                consumed: 1,
            },
            None if ch.is_whitespace() => Step::Blank,
            None => Step::Unknown(ch),
        }
    }
}

/// Tokenize `text` with the global phoneme table.
pub fn tokenize(text: &str) -> Tokenized {
    Tokenizer::global().tokenize(text)
}

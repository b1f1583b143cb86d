//! Recognizer grammar for forced alignment.
//!
//! The lexicon lists one word per phoneme, bracketed by the two silence
//! sentinels. The automaton is a branch-free chain over those words, so the
//! recognizer can only accept the given phoneme sequence in order.

use std::fmt::Write;

use tracing::{debug, debug_span};

use crate::settings::{settings, GrammarSettings};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GrammarError {
    #[error("automaton word count {automaton} does not match lexicon length {lexicon}")]
    ArtifactDesync { lexicon: usize, automaton: usize },
    #[error("word count {0} leaves no room for the two silence sentinels")]
    WordCountTooSmall(usize),
}

/// Lexicon and automaton documents for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarArtifacts {
    pub lexicon: String,
    pub automaton: String,
    /// Lexicon entries including both sentinels (`phonemes + 2`).
    pub word_count: usize,
}

impl GrammarArtifacts {
    /// Encode both documents, checking that `word_count` matches the lexicon.
    pub fn encode(phonemes: &[String], word_count: usize) -> Result<Self, GrammarError> {
        let _span = debug_span!("encode_grammar", phoneme_count = phonemes.len()).entered();
        let lexicon_len = phonemes.len() + 2;
        if word_count != lexicon_len {
            return Err(GrammarError::ArtifactDesync {
                lexicon: lexicon_len,
                automaton: word_count,
            });
        }
        let lexicon = encode_lexicon(phonemes);
        let automaton = encode_automaton(word_count)?;
        debug!(word_count);
        Ok(Self {
            lexicon,
            automaton,
            word_count,
        })
    }

    /// Encode both documents with the word count taken from the lexicon.
    pub fn for_phonemes(phonemes: &[String]) -> Self {
        let word_count = phonemes.len() + 2;
        Self {
            lexicon: encode_lexicon(phonemes),
            automaton: render_automaton(word_count),
            word_count,
        }
    }
}

/// One line `"{index}\t[{tag}{index}]\t{word}"` per word of
/// `[begin_silence, phonemes.., end_silence]`.
pub fn encode_lexicon(phonemes: &[String]) -> String {
    encode_lexicon_with(&settings().grammar, phonemes)
}

pub fn encode_lexicon_with(grammar: &GrammarSettings, phonemes: &[String]) -> String {
    let words = std::iter::once(grammar.begin_silence.as_str())
        .chain(phonemes.iter().map(String::as_str))
        .chain(std::iter::once(grammar.end_silence.as_str()));

    let mut out = String::new();
    for (i, word) in words.enumerate() {
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{i}\t[{}{i}]\t{word}", grammar.word_tag_prefix);
    }
    out
}

/// Linear automaton over `word_count` words.
///
/// State `i` accepts category `word_count - 1 - i` and moves to `i + 1`;
/// state 0 is the start state. A final accepting state with no outgoing
/// transition closes the chain, for `word_count + 1` lines in total.
pub fn encode_automaton(word_count: usize) -> Result<String, GrammarError> {
    if word_count < 2 {
        return Err(GrammarError::WordCountTooSmall(word_count));
    }
    Ok(render_automaton(word_count))
}

fn render_automaton(word_count: usize) -> String {
    let last = word_count - 1;
    let mut out = String::new();
    for i in 0..=last {
        let category = last - i;
        let is_start = u8::from(i == 0);
        let _ = writeln!(out, "{i} {category} {} 0 {is_start}", i + 1);
    }
    let _ = writeln!(out, "{} -1 -1 1 0", last + 1);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phonemes(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_lexicon_lines() {
        let dict = encode_lexicon(&phonemes(&["k", "a"]));
        let lines: Vec<&str> = dict.lines().collect();
        assert_eq!(
            lines,
            ["0\t[w_0]\tsilB", "1\t[w_1]\tk", "2\t[w_2]\ta", "3\t[w_3]\tsilE"]
        );
    }

    #[test]
    fn test_lexicon_empty_sequence_has_sentinels_only() {
        let dict = encode_lexicon(&[]);
        assert_eq!(dict, "0\t[w_0]\tsilB\n1\t[w_1]\tsilE\n");
    }

    #[test]
    fn test_lexicon_line_count() {
        for n in [0, 1, 5, 40] {
            let seq = vec!["a".to_string(); n];
            assert_eq!(encode_lexicon(&seq).lines().count(), n + 2);
        }
    }

    #[test]
    fn test_lexicon_custom_settings() {
        let grammar = GrammarSettings {
            begin_silence: "sp_b".into(),
            end_silence: "sp_e".into(),
            word_tag_prefix: "p".into(),
        };
        let dict = encode_lexicon_with(&grammar, &phonemes(&["o"]));
        assert_eq!(dict, "0\t[p0]\tsp_b\n1\t[p1]\to\n2\t[p2]\tsp_e\n");
    }

    #[test]
    fn test_automaton_chain() {
        let dfa = encode_automaton(4).unwrap();
        assert_eq!(dfa, "0 3 1 0 1\n1 2 2 0 0\n2 1 3 0 0\n3 0 4 0 0\n4 -1 -1 1 0\n");
    }

    #[test]
    fn test_automaton_line_count_and_single_start() {
        for n in [0usize, 1, 7, 100] {
            let dfa = encode_automaton(n + 2).unwrap();
            let lines: Vec<&str> = dfa.lines().collect();
            assert_eq!(lines.len(), n + 3);
            let starts: Vec<usize> = lines
                .iter()
                .enumerate()
                .filter(|(_, l)| l.ends_with(" 1") && !l.contains("-1"))
                .map(|(i, _)| i)
                .collect();
            assert_eq!(starts, [0]);
            assert_eq!(*lines.last().unwrap(), format!("{} -1 -1 1 0", n + 2));
        }
    }

    #[test]
    fn test_automaton_rejects_tiny_word_count() {
        assert_eq!(encode_automaton(1), Err(GrammarError::WordCountTooSmall(1)));
        assert_eq!(encode_automaton(0), Err(GrammarError::WordCountTooSmall(0)));
    }

    #[test]
    fn test_artifacts_encode() {
        let seq = phonemes(&["t", "o", "o"]);
        let artifacts = GrammarArtifacts::encode(&seq, 5).unwrap();
        assert_eq!(artifacts.word_count, 5);
        assert_eq!(artifacts.lexicon.lines().count(), 5);
        assert_eq!(artifacts.automaton.lines().count(), 6);
        assert_eq!(artifacts, GrammarArtifacts::for_phonemes(&seq));
    }

    #[test]
    fn test_artifacts_desync() {
        let seq = phonemes(&["a"]);
        let err = GrammarArtifacts::encode(&seq, 2).unwrap_err();
        assert_eq!(
            err,
            GrammarError::ArtifactDesync {
                lexicon: 3,
                automaton: 2
            }
        );
        assert!(err.to_string().contains("does not match"));
    }
}

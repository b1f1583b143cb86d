//! Forced-alignment orchestration.
//!
//! Tokenizes the text, encodes the grammar, hands both to an [`Aligner`]
//! (the external recognizer), and regroups its report into grapheme timings.
//! The aligner call is the only blocking step; timeouts and retries belong to
//! the caller.

use serde::Serialize;
use tracing::{debug, debug_span};

use crate::alignment::{parse_report, regroup, AlignmentError, TimedGrapheme};
use crate::grammar::{GrammarArtifacts, GrammarError};
use crate::phoneme::PhonemeTable;
use crate::tokenizer::{TokenizeDiagnostic, Tokenizer};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Grammar(#[from] GrammarError),
    #[error("recognizer failed while {context}: {message}")]
    Recognizer {
        context: &'static str,
        message: String,
    },
    #[error(transparent)]
    Alignment(#[from] AlignmentError),
}

impl PipelineError {
    pub fn recognizer(context: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Recognizer {
            context,
            message: err.to_string(),
        }
    }
}

/// External recognizer: grammar + audio in, raw text report out.
pub trait Aligner: Send + Sync {
    fn align(&self, grammar: &GrammarArtifacts, audio: &[u8]) -> Result<String, PipelineError>;
}

impl<A: Aligner + ?Sized> Aligner for &A {
    fn align(&self, grammar: &GrammarArtifacts, audio: &[u8]) -> Result<String, PipelineError> {
        (**self).align(grammar, audio)
    }
}

impl<A: Aligner + ?Sized> Aligner for Box<A> {
    fn align(&self, grammar: &GrammarArtifacts, audio: &[u8]) -> Result<String, PipelineError> {
        (**self).align(grammar, audio)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentOutput {
    pub segments: Vec<TimedGrapheme>,
    pub truncated: bool,
    pub diagnostics: Vec<TokenizeDiagnostic>,
}

pub struct ForcedAligner<'t, A> {
    aligner: A,
    tokenizer: Tokenizer<'t>,
}

impl<A: Aligner> ForcedAligner<'static, A> {
    /// Aligner over the global phoneme table.
    pub fn new(aligner: A) -> Self {
        Self {
            aligner,
            tokenizer: Tokenizer::global(),
        }
    }
}

impl<'t, A: Aligner> ForcedAligner<'t, A> {
    pub fn with_table(aligner: A, table: &'t PhonemeTable) -> Self {
        Self {
            aligner,
            tokenizer: Tokenizer::new(table),
        }
    }

    pub fn align(&self, text: &str, audio: &[u8]) -> Result<AlignmentOutput, PipelineError> {
        let _span = debug_span!("forced_align", audio_bytes = audio.len()).entered();

        let tokenized = self.tokenizer.tokenize(text);
        let transcription = &tokenized.transcription;

        let grammar =
            GrammarArtifacts::encode(&transcription.phonemes, transcription.phonemes.len() + 2)?;
        let raw = self.aligner.align(&grammar, audio)?;
        let timed = parse_report(&raw);
        let regrouped = regroup(&transcription.units, &timed)?;

        if regrouped.truncated {
            debug!(
                aligned = regrouped.segments.len(),
                expected = transcription.units.len(),
                "returning truncated alignment"
            );
        }
        Ok(AlignmentOutput {
            segments: regrouped.segments,
            truncated: regrouped.truncated,
            diagnostics: tokenized.diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingAligner;

    impl Aligner for FailingAligner {
        fn align(&self, _: &GrammarArtifacts, _: &[u8]) -> Result<String, PipelineError> {
            Err(PipelineError::recognizer("running recognizer", "exit status 1"))
        }
    }

    #[test]
    fn test_recognizer_error_propagates() {
        let err = ForcedAligner::new(FailingAligner)
            .align("あ", b"RIFF")
            .unwrap_err();
        assert!(matches!(err, PipelineError::Recognizer { .. }));
        assert_eq!(
            err.to_string(),
            "recognizer failed while running recognizer: exit status 1"
        );
    }

    #[test]
    fn test_boxed_aligner() {
        let boxed: Box<dyn Aligner> = Box::new(FailingAligner);
        let err = ForcedAligner::new(boxed).align("あ", &[]).unwrap_err();
        assert!(matches!(err, PipelineError::Recognizer { .. }));
    }
}

pub mod alignment;
pub mod grammar;
pub mod phoneme;
pub mod pipeline;
pub mod settings;
pub mod tokenizer;

pub use alignment::{parse_report, regroup, AlignmentError, Regrouped, TimedGrapheme, TimedPhoneme};
pub use grammar::{encode_automaton, encode_lexicon, GrammarArtifacts, GrammarError};
pub use phoneme::PhonemeTable;
pub use pipeline::{Aligner, AlignmentOutput, ForcedAligner, PipelineError};
pub use tokenizer::{tokenize, GraphemeUnit, TokenizeDiagnostic, Tokenized, Tokenizer, Transcription};

use serde::Serialize;
use tracing::{debug, debug_span, warn};

use super::{AlignmentError, TimedGrapheme, TimedPhoneme};
use crate::settings::{settings, GrammarSettings};
use crate::tokenizer::GraphemeUnit;

/// Grapheme timings, possibly cut short.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Regrouped {
    pub segments: Vec<TimedGrapheme>,
    /// The timed stream ran out before every unit was satisfied; `segments`
    /// holds only the fully covered prefix.
    pub truncated: bool,
}

/// Group the timed phoneme stream back into grapheme units.
pub fn regroup(
    units: &[GraphemeUnit],
    timed: &[TimedPhoneme],
) -> Result<Regrouped, AlignmentError> {
    regroup_with(&settings().grammar, units, timed)
}

/// Strip the silence sentinels, then consume `unit.phonemes.len()` timed
/// segments per unit in order.
///
/// Fails with [`AlignmentError::NoAlignment`] when nothing but sentinels
/// remains. A unit with no phonemes (unresolved long-vowel mark) becomes a
/// zero-length segment at the previous unit's end.
pub fn regroup_with(
    grammar: &GrammarSettings,
    units: &[GraphemeUnit],
    timed: &[TimedPhoneme],
) -> Result<Regrouped, AlignmentError> {
    let _span = debug_span!("regroup", unit_count = units.len()).entered();

    let speech: Vec<&TimedPhoneme> = timed
        .iter()
        .filter(|t| !grammar.is_sentinel(&t.phoneme))
        .collect();
    if speech.is_empty() {
        return Err(AlignmentError::NoAlignment);
    }

    let mut segments = Vec::with_capacity(units.len());
    let mut cursor = 0;
    let mut last_end = speech[0].start;
    let mut truncated = false;

    for unit in units {
        let needed = unit.phonemes.len();
        if cursor + needed > speech.len() {
            warn!(
                surface = %unit.surface,
                needed,
                remaining = speech.len() - cursor,
                "phoneme count mismatch, truncating alignment"
            );
            truncated = true;
            break;
        }

        let consumed = &speech[cursor..cursor + needed];
        let (start, end) = match (consumed.first(), consumed.last()) {
            (Some(first), Some(last)) => (first.start, last.end),
            _ => (last_end, last_end),
        };
        segments.push(TimedGrapheme {
            surface: unit.surface.clone(),
            phonemes: consumed.iter().map(|t| t.phoneme.clone()).collect(),
            start,
            end,
            duration: end - start,
        });
        last_end = end;
        cursor += needed;
    }

    if !truncated && cursor < speech.len() {
        debug!(unconsumed = speech.len() - cursor, "recognizer emitted extra phonemes");
    }
    debug!(segment_count = segments.len(), truncated);
    Ok(Regrouped {
        segments,
        truncated,
    })
}

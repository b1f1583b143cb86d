//! Reconstruction of per-grapheme timing from the recognizer's report.
//!
//! `parse_report` extracts the flat timed-phoneme stream from the text
//! report; `regroup` folds it back onto the tokenizer's grapheme units.

mod regroup;
mod report;

pub use regroup::{regroup, regroup_with, Regrouped};
pub use report::{parse_report, parse_report_with};

use serde::Serialize;

/// One `[start end] score phoneme` line of the alignment region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimedPhoneme {
    pub phoneme: String,
    pub start_frame: u32,
    pub end_frame: u32,
    /// Recognizer score, carried through but not interpreted.
    pub score: f32,
    /// Seconds
    pub start: f64,
    /// Seconds
    pub end: f64,
}

/// Timing for one grapheme unit. Times are in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimedGrapheme {
    pub surface: String,
    pub phonemes: Vec<String>,
    pub start: f64,
    pub end: f64,
    pub duration: f64,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AlignmentError {
    #[error("no alignment result found in recognizer report")]
    NoAlignment,
}

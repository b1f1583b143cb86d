use tracing::{debug, debug_span};

use super::TimedPhoneme;
use crate::settings::{settings, ReportSettings};

/// Extract timed phonemes from the forced-alignment region(s) of `raw`.
///
/// Lines outside the begin/end markers, and lines inside that do not have
/// the `[start end] score phoneme` shape, are ignored. Output keeps file order.
pub fn parse_report(raw: &str) -> Vec<TimedPhoneme> {
    parse_report_with(&settings().report, raw)
}

pub fn parse_report_with(report: &ReportSettings, raw: &str) -> Vec<TimedPhoneme> {
    let _span = debug_span!("parse_report", bytes = raw.len()).entered();
    let mut segments = Vec::new();
    let mut in_region = false;

    for line in raw.lines() {
        if line.contains(report.begin_marker.as_str()) {
            in_region = true;
            continue;
        }
        if line.contains(report.end_marker.as_str()) {
            in_region = false;
            continue;
        }
        if !in_region {
            continue;
        }
        if let Some((start_frame, end_frame, score, phoneme)) = parse_frame_line(line) {
            segments.push(TimedPhoneme {
                phoneme: phoneme.to_string(),
                start_frame,
                end_frame,
                score,
                start: f64::from(start_frame) * report.frame_seconds,
                end: f64::from(end_frame) * report.frame_seconds,
            });
        }
    }

    debug!(segment_count = segments.len());
    segments
}

/// Parse `[ <start> <end>] <score> <phoneme>`, tolerating padding after the
/// opening bracket and trailing columns after the phoneme.
///
/// Frames are plain ASCII digits and the score uses only digits, `.` and `-`,
/// so signs, `nan` and `inf` never slip through `FromStr`.
fn parse_frame_line(line: &str) -> Option<(u32, u32, f32, &str)> {
    let rest = line.trim_start().strip_prefix('[')?;
    let (frames, rest) = rest.split_once(']')?;
    if !frames.ends_with(|c: char| c.is_ascii_digit()) || !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let mut frames = frames.split_whitespace();
    let start = parse_frame(frames.next()?)?;
    let end = parse_frame(frames.next()?)?;
    if frames.next().is_some() {
        return None;
    }

    let mut fields = rest.split_whitespace();
    let score = fields.next()?;
    if !score.bytes().all(|b| b.is_ascii_digit() || b == b'.' || b == b'-') {
        return None;
    }
    let score: f32 = score.parse().ok()?;
    let phoneme = fields.next()?;
    Some((start, end, score, phoneme))
}

fn parse_frame(field: &str) -> Option<u32> {
    if !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

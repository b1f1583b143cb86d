//! Human-readable rendering of tokenizer and alignment results.

use unicode_width::UnicodeWidthStr;

use kanafa_core::alignment::TimedGrapheme;
use kanafa_core::pipeline::AlignmentOutput;
use kanafa_core::tokenizer::{TokenizeDiagnostic, Tokenized};

const SURFACE_COLUMN: usize = 6;

/// Pad `s` to `width` display columns (kana are two columns wide).
fn pad(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    if w < width {
        format!("{s}{}", " ".repeat(width - w))
    } else {
        s.to_string()
    }
}

fn push_diagnostics(out: &mut String, diagnostics: &[TokenizeDiagnostic]) {
    for d in diagnostics {
        out.push_str(&format!("warning: {d}\n"));
    }
}

pub fn format_tokenized(t: &Tokenized) -> String {
    let mut out = String::new();
    for (i, unit) in t.transcription.units.iter().enumerate() {
        out.push_str(&format!(
            "  [{i:>3}] {} {}\n",
            pad(&unit.surface, SURFACE_COLUMN),
            unit.phonemes.join(" "),
        ));
    }
    out.push_str(&format!(
        "phonemes ({}): {}\n",
        t.transcription.phonemes.len(),
        t.transcription.phonemes.join(" ")
    ));
    push_diagnostics(&mut out, &t.diagnostics);
    out
}

pub fn format_segments(segments: &[TimedGrapheme], truncated: bool) -> String {
    let mut out = String::new();
    for seg in segments {
        out.push_str(&format!(
            "  {} {:>8.3} {:>8.3} {:>7.3}  {}\n",
            pad(&seg.surface, SURFACE_COLUMN),
            seg.start,
            seg.end,
            seg.duration,
            seg.phonemes.join(" "),
        ));
    }
    if truncated {
        out.push_str("warning: alignment truncated; fewer phonemes recognized than expected\n");
    }
    out
}

pub fn format_alignment(output: &AlignmentOutput) -> String {
    let mut out = format_segments(&output.segments, output.truncated);
    push_diagnostics(&mut out, &output.diagnostics);
    out
}

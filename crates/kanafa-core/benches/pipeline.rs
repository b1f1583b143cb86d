use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use kanafa_core::alignment::{parse_report, regroup};
use kanafa_core::grammar::GrammarArtifacts;
use kanafa_core::tokenize;

const INPUTS: &[(&str, &str)] = &[
    ("short", "きょうはいいてんきですね"),
    ("long_vowels", "らーめんとぎゅーどんとこーひー"),
    (
        "paragraph",
        "むかしむかし あるところに おじいさんと おばあさんが すんでいました \
         おじいさんは やまへ しばかりに おばあさんは かわへ せんたくに いきました",
    ),
];

/// Canned recognizer report covering every phoneme with 8 frames.
fn fake_report(phonemes: &[String]) -> String {
    let mut out = String::from("=== begin forced alignment ===\n");
    let words = std::iter::once("silB")
        .chain(phonemes.iter().map(String::as_str))
        .chain(std::iter::once("silE"));
    for (i, w) in words.enumerate() {
        let start = i * 8;
        out.push_str(&format!("[{:5} {:5}] -10.000000 {w}\n", start, start + 7));
    }
    out.push_str("=== end forced alignment ===\n");
    out
}

fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");
    for &(label, text) in INPUTS {
        group.bench_with_input(BenchmarkId::new(label, text.len()), &text, |b, &text| {
            b.iter(|| tokenize(text));
        });
    }
    group.finish();
}

fn bench_grammar(c: &mut Criterion) {
    let mut group = c.benchmark_group("grammar");
    for &(label, text) in INPUTS {
        let phonemes = tokenize(text).transcription.phonemes;
        group.bench_with_input(
            BenchmarkId::new(label, phonemes.len()),
            &phonemes,
            |b, phonemes| {
                b.iter(|| GrammarArtifacts::for_phonemes(phonemes));
            },
        );
    }
    group.finish();
}

fn bench_reconstruct(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconstruct");
    for &(label, text) in INPUTS {
        let transcription = tokenize(text).transcription;
        let report = fake_report(&transcription.phonemes);
        group.bench_with_input(
            BenchmarkId::new(label, transcription.units.len()),
            &report,
            |b, report| {
                b.iter(|| {
                    let timed = parse_report(report);
                    regroup(&transcription.units, &timed)
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_tokenize, bench_grammar, bench_reconstruct);
criterion_main!(benches);

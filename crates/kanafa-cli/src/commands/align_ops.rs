use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Serialize;

use kanafa_core::alignment::{parse_report, regroup};
use kanafa_core::grammar::GrammarArtifacts;
use kanafa_core::pipeline::ForcedAligner;
use kanafa_core::settings::settings;
use kanafa_core::tokenize;

use super::CommandResult;
use crate::format::{format_alignment, format_segments, format_tokenized};
use crate::recognizer::JuliusProcess;

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    println!(
        "{}",
        die!(serde_json::to_string_pretty(value), "JSON serialization failed: {}")
    );
    Ok(())
}

pub fn tokenize_text(text: &str, json: bool) -> Result<(), String> {
    let tokenized = tokenize(text);
    if json {
        print_json(&tokenized)?;
    } else {
        print!("{}", format_tokenized(&tokenized));
    }
    Ok(())
}

pub fn grammar(text: &str, out_dir: Option<&str>) -> Result<(), String> {
    let tokenized = tokenize(text);
    for d in &tokenized.diagnostics {
        eprintln!("warning: {d}");
    }
    let artifacts = GrammarArtifacts::for_phonemes(&tokenized.transcription.phonemes);

    match out_dir {
        Some(dir) => {
            let dir = Path::new(dir);
            die!(fs::create_dir_all(dir), "Error creating {}: {}", dir.display());
            let dict = dir.join("input.dict");
            let dfa = dir.join("input.dfa");
            die!(fs::write(&dict, &artifacts.lexicon), "Error writing {}: {}", dict.display());
            die!(fs::write(&dfa, &artifacts.automaton), "Error writing {}: {}", dfa.display());
            println!(
                "Wrote {} ({} words) and {}",
                dict.display(),
                artifacts.word_count,
                dfa.display()
            );
        }
        None => {
            println!("# input.dict");
            print!("{}", artifacts.lexicon);
            println!("# input.dfa");
            print!("{}", artifacts.automaton);
        }
    }
    Ok(())
}

pub fn regroup_report(text: &str, report_file: &str, json: bool) -> CommandResult {
    let raw = die!(fs::read(report_file), "Error reading {report_file}: {}");
    let raw = String::from_utf8_lossy(&raw);
    let tokenized = tokenize(text);
    for d in &tokenized.diagnostics {
        eprintln!("warning: {d}");
    }

    let timed = parse_report(&raw);
    let regrouped = die!(regroup(&tokenized.transcription.units, &timed), "Error: {}");

    if json {
        print_json(&regrouped)?;
    } else {
        print!("{}", format_segments(&regrouped.segments, regrouped.truncated));
    }
    Ok(regrouped.truncated)
}

pub fn align(text: &str, audio_file: &str, json: bool, timeout_secs: Option<u64>) -> CommandResult {
    let audio = die!(fs::read(audio_file), "Error reading {audio_file}: {}");
    let recognizer = JuliusProcess::from_settings(&settings().recognizer)
        .with_timeout(timeout_secs.map(Duration::from_secs));

    let output = die!(ForcedAligner::new(recognizer).align(text, &audio), "Error: {}");

    if json {
        print_json(&output)?;
    } else {
        print!("{}", format_alignment(&output));
    }
    Ok(output.truncated)
}

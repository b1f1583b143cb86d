use std::fs;

use kanafa_core::phoneme::{self, PhonemeTable};
use kanafa_core::settings;

/// Install custom settings and phoneme table before anything reads them.
pub fn init_overrides(config: Option<&str>, phonemes: Option<&str>) -> Result<(), String> {
    if let Some(file) = config {
        let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
        die!(settings::init_custom(content), "Error in {file}: {}");
    }
    if let Some(file) = phonemes {
        let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
        die!(PhonemeTable::init_custom(content), "Error in {file}: {}");
    }
    Ok(())
}

pub fn phonemes_export() {
    print!("{}", phoneme::default_toml());
}

pub fn phonemes_validate(file: &str) -> Result<(), String> {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let map = die!(phoneme::parse_phoneme_toml(&content), "Error: {}");
    let youon = map.keys().filter(|k| k.chars().count() == 2).count();
    println!("OK: {} mappings ({} two-codepoint)", map.len(), youon);
    Ok(())
}

pub fn settings_export() {
    print!("{}", settings::default_toml());
}

pub fn settings_validate(file: &str) -> Result<(), String> {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let s = die!(settings::parse_settings_toml(&content), "Error: {}");
    println!(
        "OK: sentinels={}/{}, frame_seconds={}, recognizer={}",
        s.grammar.begin_silence, s.grammar.end_silence, s.report.frame_seconds, s.recognizer.program
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_missing_file() {
        let err = settings_validate("/nonexistent/kanafa.toml").unwrap_err();
        assert!(err.starts_with("Error reading /nonexistent/kanafa.toml"), "{err}");
    }

    #[test]
    fn test_validate_rejects_bad_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("phonemes.toml");
        fs::write(&path, "[mappings]\n\"あ\" = []\n").unwrap();
        let err = phonemes_validate(&path.to_string_lossy()).unwrap_err();
        assert!(err.contains("empty phoneme list"), "{err}");
    }

    #[test]
    fn test_validate_accepts_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings_path = dir.path().join("settings.toml");
        let phonemes_path = dir.path().join("phonemes.toml");
        fs::write(&settings_path, settings::default_toml()).unwrap();
        fs::write(&phonemes_path, phoneme::default_toml()).unwrap();
        assert_eq!(settings_validate(&settings_path.to_string_lossy()), Ok(()));
        assert_eq!(phonemes_validate(&phonemes_path.to_string_lossy()), Ok(()));
    }
}

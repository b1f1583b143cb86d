//! Global settings loaded from TOML, following the same OnceLock pattern as the phoneme table.
//!
//! - `init_custom(toml_content)` sets a custom TOML before first `settings()` call
//! - `settings()` returns `&'static Settings` (lazy-init singleton)
//! - Default values are embedded via `include_str!("default_settings.toml")`

use std::sync::OnceLock;

use serde::Deserialize;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Set custom TOML before first `settings()` call.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Get or initialize the global settings singleton.
pub fn settings() -> &'static Settings {
    static INSTANCE: OnceLock<Settings> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let toml_str = CUSTOM_TOML
            .get()
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_SETTINGS_TOML);
        parse_settings_toml(toml_str).expect("settings TOML must be valid")
    })
}

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub grammar: GrammarSettings,
    pub report: ReportSettings,
    pub recognizer: RecognizerSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GrammarSettings {
    pub begin_silence: String,
    pub end_silence: String,
    pub word_tag_prefix: String,
}

impl GrammarSettings {
    pub fn is_sentinel(&self, phoneme: &str) -> bool {
        phoneme == self.begin_silence || phoneme == self.end_silence
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportSettings {
    pub begin_marker: String,
    pub end_marker: String,
    /// Seconds per recognizer frame.
    pub frame_seconds: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecognizerSettings {
    pub program: String,
    pub acoustic_model: String,
    #[serde(default)]
    pub args: Vec<String>,
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_non_blank {
        ($section:ident . $field:ident) => {
            if s.$section.$field.trim().is_empty() {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must not be blank".to_string(),
                });
            }
        };
    }

    check_non_blank!(grammar.begin_silence);
    check_non_blank!(grammar.end_silence);
    check_non_blank!(grammar.word_tag_prefix);
    if s.grammar.begin_silence == s.grammar.end_silence {
        return Err(SettingsError::InvalidValue {
            field: "grammar.end_silence".to_string(),
            reason: "must differ from grammar.begin_silence".to_string(),
        });
    }

    check_non_blank!(report.begin_marker);
    check_non_blank!(report.end_marker);
    if !(s.report.frame_seconds.is_finite() && s.report.frame_seconds > 0.0) {
        return Err(SettingsError::InvalidValue {
            field: "report.frame_seconds".to_string(),
            reason: "must be positive".to_string(),
        });
    }

    check_non_blank!(recognizer.program);

    Ok(())
}

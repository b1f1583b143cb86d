use std::path::Path;
use std::process;

use clap::{Parser, Subcommand};

use kanafa_cli::commands::{self, align_ops, config_ops, CommandResult};
use kanafa_cli::trace_init;

#[derive(Parser)]
#[command(name = "kanafa", about = "Hiragana forced-alignment front end")]
struct Cli {
    /// Settings TOML overriding the embedded defaults
    #[arg(long, global = true)]
    config: Option<String>,
    /// Phoneme table TOML overriding the embedded defaults
    #[arg(long, global = true)]
    phonemes: Option<String>,
    /// Write JSON trace logs to this directory instead of stderr
    #[arg(long, global = true)]
    log_dir: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the grapheme and phoneme sequence for hiragana text
    Tokenize {
        /// Hiragana text
        text: String,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print or write the recognizer lexicon (.dict) and automaton (.dfa)
    Grammar {
        /// Hiragana text
        text: String,
        /// Write input.dict and input.dfa into this directory
        #[arg(long)]
        out_dir: Option<String>,
    },
    /// Rebuild per-character timing from a saved recognizer report
    Regroup {
        /// Hiragana text the report was aligned against
        text: String,
        /// Recognizer stdout captured to a file
        report_file: String,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Run the recognizer on audio and print per-character timing
    Align {
        /// Hiragana text spoken in the audio
        text: String,
        /// Audio file passed to the recognizer (16kHz, 16bit, mono WAV)
        audio_file: String,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
        /// Kill the recognizer after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
    /// Settings file operations
    Config {
        #[command(subcommand)]
        action: FileAction,
    },
    /// Phoneme table operations
    Phonemes {
        #[command(subcommand)]
        action: FileAction,
    },
}

#[derive(Subcommand)]
enum FileAction {
    /// Print the embedded default TOML
    Export,
    /// Validate a TOML file
    Validate {
        /// TOML file to check
        file: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let guard = match cli.log_dir.as_deref() {
        Some(dir) => Some(trace_init::init_file(Path::new(dir))),
        None => {
            trace_init::init_stderr();
            None
        }
    };
    let result = config_ops::init_overrides(cli.config.as_deref(), cli.phonemes.as_deref())
        .and_then(|()| run(cli.command));
    let status = commands::exit_status(result);

    // process::exit skips destructors; flush file logs first.
    drop(guard);
    if status != 0 {
        process::exit(status);
    }
}

fn run(command: Command) -> CommandResult {
    match command {
        Command::Tokenize { text, json } => align_ops::tokenize_text(&text, json).map(|()| false),
        Command::Grammar { text, out_dir } => {
            align_ops::grammar(&text, out_dir.as_deref()).map(|()| false)
        }
        Command::Regroup {
            text,
            report_file,
            json,
        } => align_ops::regroup_report(&text, &report_file, json),
        Command::Align {
            text,
            audio_file,
            json,
            timeout_secs,
        } => align_ops::align(&text, &audio_file, json, timeout_secs),
        Command::Config { action } => match action {
            FileAction::Export => {
                config_ops::settings_export();
                Ok(false)
            }
            FileAction::Validate { file } => config_ops::settings_validate(&file).map(|()| false),
        },
        Command::Phonemes { action } => match action {
            FileAction::Export => {
                config_ops::phonemes_export();
                Ok(false)
            }
            FileAction::Validate { file } => config_ops::phonemes_validate(&file).map(|()| false),
        },
    }
}

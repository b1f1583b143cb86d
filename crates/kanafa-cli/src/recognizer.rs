//! Julius-style recognizer run as a child process.
//!
//! Stages the grammar, audio and file list in a temporary directory, runs the
//! configured program against them and returns its stdout as the raw report.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, debug_span};

use kanafa_core::grammar::GrammarArtifacts;
use kanafa_core::pipeline::{Aligner, PipelineError};
use kanafa_core::settings::RecognizerSettings;

const POLL_INTERVAL: Duration = Duration::from_millis(20);
const STDERR_TAIL_BYTES: usize = 512;

/// Paths of the staged recognizer inputs.
#[derive(Debug)]
pub struct StagedInputs {
    pub dict: PathBuf,
    pub dfa: PathBuf,
    pub audio: PathBuf,
    pub filelist: PathBuf,
}

impl StagedInputs {
    /// Write all recognizer inputs into `dir`.
    pub fn write(
        dir: &Path,
        grammar: &GrammarArtifacts,
        audio: &[u8],
    ) -> std::io::Result<Self> {
        let staged = Self {
            dict: dir.join("input.dict"),
            dfa: dir.join("input.dfa"),
            audio: dir.join("input.wav"),
            filelist: dir.join("filelist.txt"),
        };
        fs::write(&staged.dict, &grammar.lexicon)?;
        fs::write(&staged.dfa, &grammar.automaton)?;
        fs::write(&staged.audio, audio)?;
        fs::write(&staged.filelist, format!("{}\n", staged.audio.display()))?;
        Ok(staged)
    }
}

pub struct JuliusProcess {
    program: String,
    acoustic_model: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl JuliusProcess {
    pub fn from_settings(settings: &RecognizerSettings) -> Self {
        Self {
            program: settings.program.clone(),
            acoustic_model: settings.acoustic_model.clone(),
            args: settings.args.clone(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configured arguments first, then the staged grammar and file list.
    pub fn command(&self, staged: &StagedInputs) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg("-h")
            .arg(&self.acoustic_model)
            .arg("-dfa")
            .arg(&staged.dfa)
            .arg("-v")
            .arg(&staged.dict)
            .arg("-filelist")
            .arg(&staged.filelist);
        cmd
    }

    fn wait(&self, child: &mut Child) -> Result<ExitStatus, PipelineError> {
        let Some(limit) = self.timeout else {
            return child
                .wait()
                .map_err(|e| PipelineError::recognizer("waiting for recognizer", e));
        };

        let started = Instant::now();
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) if started.elapsed() >= limit => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(PipelineError::recognizer(
                        "waiting for recognizer",
                        format!("timed out after {limit:?}"),
                    ));
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => return Err(PipelineError::recognizer("waiting for recognizer", e)),
            }
        }
    }
}

impl Aligner for JuliusProcess {
    fn align(&self, grammar: &GrammarArtifacts, audio: &[u8]) -> Result<String, PipelineError> {
        let _span = debug_span!("recognizer", program = %self.program).entered();

        let dir = tempfile::Builder::new()
            .prefix("kanafa-")
            .tempdir()
            .map_err(|e| PipelineError::recognizer("creating staging directory", e))?;
        let staged = StagedInputs::write(dir.path(), grammar, audio)
            .map_err(|e| PipelineError::recognizer("staging inputs", e))?;

        // Output goes to files so a chatty recognizer cannot fill a pipe while
        // we poll for exit.
        let stdout_path = dir.path().join("stdout.log");
        let stderr_path = dir.path().join("stderr.log");
        let stdout = File::create(&stdout_path)
            .map_err(|e| PipelineError::recognizer("creating stdout log", e))?;
        let stderr = File::create(&stderr_path)
            .map_err(|e| PipelineError::recognizer("creating stderr log", e))?;

        let mut child = self
            .command(&staged)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .spawn()
            .map_err(|e| PipelineError::recognizer("spawning recognizer", e))?;
        let status = self.wait(&mut child)?;

        if !status.success() {
            let stderr = fs::read(&stderr_path).unwrap_or_default();
            let tail_start = stderr.len().saturating_sub(STDERR_TAIL_BYTES);
            return Err(PipelineError::recognizer(
                "running recognizer",
                format!(
                    "{status}: {}",
                    String::from_utf8_lossy(&stderr[tail_start..]).trim()
                ),
            ));
        }

        let report = fs::read(&stdout_path)
            .map_err(|e| PipelineError::recognizer("reading recognizer output", e))?;
        debug!(report_bytes = report.len());
        Ok(String::from_utf8_lossy(&report).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(program: &str, args: &[&str]) -> RecognizerSettings {
        RecognizerSettings {
            program: program.to_string(),
            acoustic_model: "am.binhmm".to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn grammar() -> GrammarArtifacts {
        GrammarArtifacts::for_phonemes(&["a".to_string()])
    }

    #[test]
    fn test_stage_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let staged = StagedInputs::write(dir.path(), &grammar(), b"RIFF").unwrap();
        assert_eq!(fs::read_to_string(&staged.dict).unwrap(), grammar().lexicon);
        assert_eq!(fs::read_to_string(&staged.dfa).unwrap(), grammar().automaton);
        assert_eq!(fs::read(&staged.audio).unwrap(), b"RIFF");
        assert_eq!(
            fs::read_to_string(&staged.filelist).unwrap(),
            format!("{}\n", staged.audio.display())
        );
    }

    #[test]
    fn test_command_arguments() {
        let dir = tempfile::tempdir().unwrap();
        let staged = StagedInputs::write(dir.path(), &grammar(), b"").unwrap();
        let julius = JuliusProcess::from_settings(&settings("julius", &["-input", "rawfile"]));
        let cmd = julius.command(&staged);
        assert_eq!(cmd.get_program(), "julius");
        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(args[..4], ["-input", "rawfile", "-h", "am.binhmm"]);
        assert_eq!(args[4], "-dfa");
        assert!(args[5].ends_with("input.dfa"));
        assert_eq!(args[6], "-v");
        assert!(args[7].ends_with("input.dict"));
        assert_eq!(args[8], "-filelist");
        assert!(args[9].ends_with("filelist.txt"));
    }

    #[test]
    fn test_missing_program() {
        let julius = JuliusProcess::from_settings(&settings("/nonexistent/kanafa-recognizer", &[]));
        let err = julius.align(&grammar(), b"").unwrap_err();
        assert!(err.to_string().contains("spawning recognizer"));
    }

    #[cfg(unix)]
    mod process {
        use super::*;

        /// Runs `script` through `sh`; the staged paths follow as positional
        /// arguments ($2 = acoustic model, $4 = dfa, $6 = dict).
        fn run(script: &str, timeout: Option<Duration>) -> Result<String, PipelineError> {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("fake-recognizer.sh");
            fs::write(&path, script).unwrap();
            let path = path.to_string_lossy().into_owned();
            JuliusProcess::from_settings(&settings("sh", &[path.as_str()]))
                .with_timeout(timeout)
                .align(&grammar(), b"RIFF")
        }

        #[test]
        fn test_captures_stdout() {
            let script = "\
grep -q silB \"$6\" || exit 7
echo '=== begin forced alignment ==='
echo '[   0    9] -1.0 silB'
echo '[  10   19] -1.0 a'
echo '[  20   29] -1.0 silE'
echo '=== end forced alignment ==='
";
            let report = run(script, None).unwrap();
            let timed = kanafa_core::parse_report(&report);
            assert_eq!(timed.len(), 3);
            assert_eq!(timed[1].phoneme, "a");
        }

        #[test]
        fn test_nonzero_exit_reports_stderr() {
            let err = run("echo 'model not found' >&2\nexit 3\n", None).unwrap_err();
            let msg = err.to_string();
            assert!(msg.contains("running recognizer"), "{msg}");
            assert!(msg.contains("model not found"), "{msg}");
        }

        #[test]
        fn test_timeout_kills_child() {
            let err = run("sleep 5\n", Some(Duration::from_millis(100))).unwrap_err();
            assert!(err.to_string().contains("timed out"));
        }
    }
}

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const ENV_VAR: &str = "KANAFA_LOG";

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_env(ENV_VAR).unwrap_or_else(|_| EnvFilter::new(default))
}

/// Human-readable log lines on stderr.
pub fn init_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(env_filter("warn"))
        .try_init();
}

/// JSON lines appended to `<log_dir>/kanafa-trace.jsonl`, with span timings.
///
/// Buffered lines are flushed when the returned guard is dropped, so the
/// caller must hold it until exit.
pub fn init_file(log_dir: &Path) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::never(log_dir, "kanafa-trace.jsonl");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let _ = tracing_subscriber::fmt()
        .json()
        .with_writer(non_blocking)
        .with_target(true)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .with_env_filter(env_filter("kanafa_core=debug,kanafa_cli=debug"))
        .try_init();
    guard
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{exit_status, EXIT_FAILURE};

    // Installs the process-wide subscriber; no other test in this crate does.
    #[test]
    fn test_failure_reaches_trace_file_after_guard_drop() {
        let dir = tempfile::tempdir().unwrap();
        let guard = init_file(dir.path());

        let status = exit_status(Err("Error: trace flush check".into()));
        assert_eq!(status, EXIT_FAILURE);
        drop(guard);

        let trace = std::fs::read_to_string(dir.path().join("kanafa-trace.jsonl")).unwrap();
        let line = trace
            .lines()
            .find(|l| l.contains("trace flush check"))
            .unwrap_or_else(|| panic!("no failure event in trace: {trace:?}"));
        let event: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(event["level"], "ERROR");
        assert_eq!(event["fields"]["message"], "command failed");
        assert_eq!(event["fields"]["error"], "Error: trace flush check");
    }
}

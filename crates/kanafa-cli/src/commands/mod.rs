/// Unwrap `$result` or return its error, formatted with `$arg`, as the
/// command's failure message. `main` prints it and exits with status 1.
macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        match $result {
            Ok(value) => value,
            Err(e) => return Err(format!($($arg)*, e)),
        }
    };
}

pub mod align_ops;
pub mod config_ops;

/// Command outcome: `Ok(true)` when the alignment came back truncated.
pub type CommandResult = Result<bool, String>;

pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_TRUNCATED: i32 = 2;

/// Map a command outcome to a process exit status, reporting failures on
/// stderr and in the trace.
pub fn exit_status(result: CommandResult) -> i32 {
    match result {
        Ok(false) => 0,
        Ok(true) => EXIT_TRUNCATED,
        Err(error) => {
            tracing::error!(%error, "command failed");
            eprintln!("{error}");
            EXIT_FAILURE
        }
    }
}

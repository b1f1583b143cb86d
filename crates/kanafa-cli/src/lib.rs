pub mod commands;
pub mod format;
pub mod recognizer;
pub mod trace_init;

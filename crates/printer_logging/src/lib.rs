#![deny(missing_docs)]
//! Shared logging utilities for the print workspace.
//!
//! This crate provides the `printer_*` logging macros used across the codebase,
//! a per-thread print job context and a minimal test initializer for the global logger.

use std::cell::Cell;

thread_local! {
    /// Thread-local storage for the print job currently being processed.
    static JOB_ID: Cell<u64> = const { Cell::new(0) };
}

/// Sets the print job id for the current thread.
/// The orchestrator calls this once at the start of every print invocation.
pub fn set_job_id(job: u64) {
    JOB_ID.with(|v| v.set(job));
}

/// Retrieves the print job id for the current thread.
/// Returns 0 outside of a print invocation.
pub fn job_id() -> u64 {
    JOB_ID.with(|v| v.get())
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! printer_trace {
    ($($arg:tt)*) => {{
        log::trace!("[job {}] {}", $crate::job_id(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! printer_debug {
    ($($arg:tt)*) => {{
        log::debug!("[job {}] {}", $crate::job_id(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! printer_info {
    ($($arg:tt)*) => {{
        log::info!("[job {}] {}", $crate::job_id(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! printer_warn {
    ($($arg:tt)*) => {{
        log::warn!("[job {}] {}", $crate::job_id(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! printer_error {
    ($($arg:tt)*) => {{
        log::error!("[job {}] {}", $crate::job_id(), format_args!($($arg)*));
    }};
}

/// Installs a debug-level stderr logger for tests, without timestamps.
///
/// Later calls keep the logger installed by the first one.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .build();
    let _ = TermLogger::init(
        LevelFilter::Debug,
        config,
        TerminalMode::Stderr,
        ColorChoice::Never,
    );
}

#[cfg(test)]
mod tests {
    use super::{job_id, set_job_id};

    #[test]
    fn job_id_is_per_thread() {
        set_job_id(7);
        assert_eq!(job_id(), 7);
        let other = std::thread::spawn(job_id).join().unwrap();
        assert_eq!(other, 0);
    }
}

//! Logging setup and level-gated helpers.
//!
//! The library itself only uses the `log` facade; binaries call
//! [`init_logger_with_default`] to route records through `env_logger`
//! (`RUST_LOG=debug` shows every frame on the wire).

use log::{debug, info, log_enabled, warn, Level};

/// Initializes the logger, falling back to `default_filter` when `RUST_LOG`
/// is not set. Safe to call more than once.
pub fn init_logger_with_default(default_filter: &str) {
    let env = env_logger::Env::default().default_filter_or(default_filter);
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Logs a warning message.
pub fn log_warn(message: &str) {
    if log_enabled!(Level::Warn) {
        warn!("{message}");
    }
}

/// Logs an informational message.
pub fn log_info(message: &str) {
    if log_enabled!(Level::Info) {
        info!("{message}");
    }
}

/// Logs a debug message.
pub fn log_debug(message: &str) {
    if log_enabled!(Level::Debug) {
        debug!("{message}");
    }
}

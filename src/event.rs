//! Log callback channel.
//!
//! Load failures are swallowed into buffer state rather than returned, so
//! this is where they become visible. Every message is also forwarded to
//! `tracing` at the matching level.

use std::sync::{Mutex, OnceLock, PoisonError};

/// Log level for the log callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

type LogCallback = Box<dyn Fn(LogLevel, &str) + Send + Sync + 'static>;

fn log_callback() -> &'static Mutex<Option<LogCallback>> {
    static CALLBACK: OnceLock<Mutex<Option<LogCallback>>> = OnceLock::new();
    CALLBACK.get_or_init(|| Mutex::new(None))
}

/// Set the global log callback, replacing any previous one.
pub fn set_log_callback<F>(callback: F)
where
    F: Fn(LogLevel, &str) + Send + Sync + 'static,
{
    let mut guard = log_callback()
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    *guard = Some(Box::new(callback));
}

/// Remove the global log callback.
pub fn clear_log_callback() {
    let mut guard = log_callback()
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    *guard = None;
}

/// Emit a log message.
pub fn emit_log(level: LogLevel, message: &str) {
    match level {
        LogLevel::Debug => tracing::debug!(target: "lazytext", "{message}"),
        LogLevel::Info => tracing::info!(target: "lazytext", "{message}"),
        LogLevel::Warn => tracing::warn!(target: "lazytext", "{message}"),
        LogLevel::Error => tracing::error!(target: "lazytext", "{message}"),
    }

    let guard = log_callback()
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    if let Some(callback) = guard.as_ref() {
        callback(level, message);
    }
}

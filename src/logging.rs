//! Logging setup for PointerPad.
//!
//! Library code logs through the `log` facade with bracketed component
//! prefixes (`[POLLER]`, `[INPUT]`, `[SYNC]`, `[CONFIG]`). Hosts that do not
//! install their own logger can call `init_logging` to get `env_logger`
//! output in the same line format the rest of the app uses.

use std::io::Write;

use chrono::Local;
use env_logger::{Builder, Env};

/// Default filter when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Format a log line: `[timestamp] [LEVEL] [target] message`.
pub fn format_line(level: log::Level, target: &str, message: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    format!("[{}] [{}] [{}] {}", timestamp, level, target, message)
}

/// Install the global logger.
///
/// `filter` overrides the default level filter; `RUST_LOG` overrides both.
/// Calling this more than once is harmless: later calls return false and
/// leave the first logger in place.
pub fn init_logging(filter: Option<&str>) -> bool {
    let env = Env::default().default_filter_or(filter.unwrap_or(DEFAULT_LOG_FILTER));

    let result = Builder::from_env(env)
        .format(|buf, record| {
            let line = format_line(
                record.level(),
                record.target(),
                &record.args().to_string(),
            );
            writeln!(buf, "{}", line)
        })
        .try_init();

    match result {
        Ok(()) => {
            log::debug!("[LOGGING] Logger initialized");
            true
        },
        Err(_) => false,
    }
}

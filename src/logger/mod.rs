//! Logger module
//!
//! Provides logging utilities for the bot including:
//! - Startup logging
//! - Access logging with multiple formats
//! - Leveled info/warning/error logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::{format_line, AccessLogEntry};

use chrono::Local;
use std::str::FromStr;

use crate::config::{AppState, Config, UpdateMode};
use crate::paths::Resolver;

/// Log severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    let level = config
        .logging
        .level
        .parse()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    writer::init(
        config.logging.log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
        level,
    )
}

fn write(level: Level, message: &str) {
    let line = format_line(&Local::now(), level, message);
    match writer::get() {
        Some(w) => w.write(level, &line),
        None if level >= Level::Warn => eprintln!("{line}"),
        None => println!("{line}"),
    }
}

pub fn log_debug(message: &str) {
    write(Level::Debug, message);
}

pub fn log_info(message: &str) {
    write(Level::Info, message);
}

pub fn log_warning(message: &str) {
    write(Level::Warn, message);
}

pub fn log_error(message: &str) {
    write(Level::Error, message);
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    let line = entry.format(format);
    match writer::get() {
        Some(w) => w.write_access(&line),
        None => println!("{line}"),
    }
}

/// Startup banner; warns about settings that expose or lock out everything
pub fn log_bot_start(state: &AppState, bot_username: Option<&str>) {
    let config = &state.config;
    log_info("======================================");
    log_info(&format!(
        "BOT DEPLOYED as @{}",
        bot_username.unwrap_or("<unknown>")
    ));
    log_info(&format!("Bot API server: {}", config.bot.api_url));
    match config.bot.mode {
        UpdateMode::Polling => log_info(&format!(
            "Receiving updates by long polling (timeout {}s)",
            config.bot.poll_timeout
        )),
        UpdateMode::Webhook => log_info(&format!(
            "Receiving updates on webhook {}:{}{}",
            config.webhook.host, config.webhook.port, config.webhook.path
        )),
    }

    let allow_list = state.guard.allow_list();
    log_info(&format!("Allow list: {} user(s)", allow_list.len()));
    if allow_list.is_empty() {
        log_warning("Allow list is empty: every /fetch will be denied");
    }

    match &state.resolver {
        Resolver::Alias(table) => log_info(&format!(
            "Path mode: alias ({} configured): {}",
            table.len(),
            table.aliases().join(", ")
        )),
        Resolver::Literal => {
            log_info("Path mode: literal");
            log_warning(
                "Literal path mode sends ANY readable path to allowed users; \
                 paths are not confined to a directory",
            );
        }
    }

    if let Some(ref path) = config.logging.log_file {
        log_info(&format!("Log file: {path}"));
    }
    log_info("Ctrl+C to terminate");
    log_info("======================================");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_parse() {
        assert_eq!("INFO".parse::<Level>().unwrap(), Level::Info);
        assert_eq!("warning".parse::<Level>().unwrap(), Level::Warn);
        assert!("verbose".parse::<Level>().is_err());
    }

    #[test]
    fn test_level_order() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Warn < Level::Error);
    }
}

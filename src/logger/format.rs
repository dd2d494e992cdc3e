//! Log line and access log formats
//!
//! Access entries support:
//! - `text` (single line, space separated)
//! - `json` (JSON structured logging)
//! - Custom patterns with variables

use chrono::{DateTime, Local};
use serde_json::json;

use super::Level;

/// Format a general log line: `<time> - file_squire - <LEVEL> - <message>`
pub fn format_line(time: &DateTime<Local>, level: Level, message: &str) -> String {
    format!(
        "{} - file_squire - {} - {message}",
        time.format("%Y-%m-%d %H:%M:%S,%3f"),
        level.as_str()
    )
}

/// One fetch attempt
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub time: DateTime<Local>,
    pub requester_id: i64,
    pub username: Option<String>,
    /// Command as typed, e.g. `/fetch`
    pub command: &'static str,
    /// Alias or path token; absent when the request was denied outright
    pub token: Option<String>,
    /// Resolved path, once known
    pub path: Option<String>,
    /// `sent`, `denied`, `alias_not_found`, ...
    pub outcome: &'static str,
    pub bytes_sent: usize,
    /// Processing time in microseconds
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Create a new access log entry with current timestamp
    pub fn new(requester_id: i64, username: Option<String>, command: &'static str) -> Self {
        Self {
            time: Local::now(),
            requester_id,
            username,
            command,
            token: None,
            path: None,
            outcome: "unknown",
            bytes_sent: 0,
            request_time_us: 0,
        }
    }

    /// Format the log entry according to the specified format
    pub fn format(&self, format: &str) -> String {
        match format {
            "text" => self.format_text(),
            "json" => self.format_json(),
            custom => self.format_custom(custom),
        }
    }

    /// `<id> @<username> [<time>] "<command> <token>" <outcome> <path> <bytes>`
    fn format_text(&self) -> String {
        format!(
            "{} @{} [{}] \"{} {}\" {} {} {}",
            self.requester_id,
            self.username.as_deref().unwrap_or("-"),
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.command,
            self.token.as_deref().unwrap_or("-"),
            self.outcome,
            self.path.as_deref().unwrap_or("-"),
            self.bytes_sent,
        )
    }

    fn format_json(&self) -> String {
        json!({
            "time": self.time.to_rfc3339(),
            "requester_id": self.requester_id,
            "username": self.username,
            "command": self.command,
            "token": self.token,
            "path": self.path,
            "outcome": self.outcome,
            "bytes_sent": self.bytes_sent,
            "request_time_us": self.request_time_us,
        })
        .to_string()
    }

    /// Custom format with variable substitution
    ///
    /// Supported variables:
    /// - `$time_local` - Local time in Common Log Format
    /// - `$time_iso8601` - ISO 8601 timestamp
    /// - `$requester_id` - Telegram user id
    /// - `$username` - Telegram username or `-`
    /// - `$command` - Command name
    /// - `$token` - Alias or path token
    /// - `$path` - Resolved path
    /// - `$outcome` - Result label
    /// - `$bytes_sent` - Bytes uploaded
    /// - `$request_time` - Processing time in seconds (3 decimal places)
    fn format_custom(&self, pattern: &str) -> String {
        let mut result = pattern.to_string();

        result = result.replace(
            "$time_local",
            &self.time.format("%d/%b/%Y:%H:%M:%S %z").to_string(),
        );
        result = result.replace("$time_iso8601", &self.time.to_rfc3339());
        result = result.replace("$requester_id", &self.requester_id.to_string());
        result = result.replace("$username", self.username.as_deref().unwrap_or("-"));
        result = result.replace("$command", self.command);
        result = result.replace("$token", self.token.as_deref().unwrap_or("-"));
        result = result.replace("$path", self.path.as_deref().unwrap_or("-"));
        result = result.replace("$outcome", self.outcome);
        result = result.replace("$bytes_sent", &self.bytes_sent.to_string());
        #[allow(clippy::cast_precision_loss)]
        let request_time = self.request_time_us as f64 / 1_000_000.0;
        result = result.replace("$request_time", &format!("{request_time:.3}"));

        result
    }
}

// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub bot: BotConfig,
    pub webhook: WebhookConfig,
    #[serde(default)]
    pub access: AccessConfig,
    pub paths: PathsConfig,
    pub logging: LoggingConfig,
}

/// How updates reach the bot
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UpdateMode {
    /// Long polling via `getUpdates`
    Polling,
    /// Telegram pushes updates to our HTTP listener
    Webhook,
}

/// How `/fetch` tokens map to paths
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PathMode {
    /// Look tokens up in `[paths.aliases]`
    Alias,
    /// Use tokens as filesystem paths, unrestricted
    Literal,
}

/// Bot API connection configuration
#[derive(Debug, Deserialize, Clone)]
pub struct BotConfig {
    pub token: String,
    /// Bot API server base URL (plain HTTP)
    pub api_url: String,
    pub mode: UpdateMode,
    /// Long-poll timeout in seconds
    pub poll_timeout: u64,
    /// Seconds to wait after a failed poll
    pub retry_delay: u64,
    /// Largest file the bot will upload, in bytes
    pub max_file_size: u64,
    /// Tokio worker threads (CPU cores if unset)
    #[serde(default)]
    pub workers: Option<usize>,
}

/// Webhook listener configuration
#[derive(Debug, Deserialize, Clone)]
pub struct WebhookConfig {
    pub host: String,
    pub port: u16,
    pub path: String,
    /// Expected `X-Telegram-Bot-Api-Secret-Token` value
    #[serde(default)]
    pub secret_token: Option<String>,
    /// Public URL registered with `setWebhook`; skipped when unset
    #[serde(default)]
    pub public_url: Option<String>,
    pub max_body_size: u64,
    /// Per-connection timeout in seconds
    pub timeout: u64,
}

/// Access configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AccessConfig {
    /// Telegram user ids allowed to run `/fetch`
    #[serde(default)]
    pub allow_list: Vec<i64>,
}

/// Path resolution configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PathsConfig {
    pub mode: PathMode,
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (text, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Log file path (optional, stdout if not set)
    #[serde(default)]
    pub log_file: Option<String>,
    /// Error log file path (optional, falls back to `log_file`, then stderr)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "text".to_string()
}

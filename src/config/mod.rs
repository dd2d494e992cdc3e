// Configuration module entry point
// Loads squire.toml, applies environment overrides and defaults, and builds
// the read-only state shared by every request

mod state;
mod types;

use std::collections::HashMap;
use std::net::SocketAddr;

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File, FileFormat};

// Re-export public types
pub use state::AppState;
pub use types::{
    AccessConfig, BotConfig, Config, LoggingConfig, PathMode, PathsConfig, UpdateMode,
    WebhookConfig,
};

use crate::logger::Level;

impl Config {
    /// Load configuration from specified file path (extension optional)
    /// Default config file is "squire.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        let settings = Self::defaults()?
            .add_source(File::with_name(config_path).required(false))
            .add_source(
                Environment::with_prefix("SQUIRE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("access.allow_list"),
            )
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse configuration from TOML text, with defaults applied
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let cfg: Self = Self::defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("bot.api_url", "http://127.0.0.1:8081")?
            .set_default("bot.mode", "polling")?
            .set_default("bot.poll_timeout", 30)?
            .set_default("bot.retry_delay", 5)?
            .set_default("bot.max_file_size", 52_428_800)? // 50MB, the Bot API upload cap
            .set_default("webhook.host", "127.0.0.1")?
            .set_default("webhook.port", 8443)?
            .set_default("webhook.path", "/telegram")?
            .set_default("webhook.max_body_size", 1_048_576)? // 1MB
            .set_default("webhook.timeout", 30)?
            .set_default("paths.mode", "alias")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "text")
    }

    /// Reject settings the bot cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot.token.trim().is_empty() {
            return Err(ConfigError::Message("bot.token must not be empty".into()));
        }
        if !self.bot.api_url.starts_with("http://") {
            return Err(ConfigError::Message(format!(
                "bot.api_url must be a plain http:// URL (got '{}'); \
                 run a local Bot API server or a TLS-terminating proxy",
                self.bot.api_url
            )));
        }
        if !self.webhook.path.starts_with('/') {
            return Err(ConfigError::Message(format!(
                "webhook.path must start with '/' (got '{}')",
                self.webhook.path
            )));
        }
        // Alias keys are lowercased on load, so these would overwrite each other
        let mut lowered: HashMap<String, &str> = HashMap::new();
        for alias in self.paths.aliases.keys() {
            if let Some(other) = lowered.insert(alias.to_lowercase(), alias.as_str()) {
                return Err(ConfigError::Message(format!(
                    "paths.aliases '{other}' and '{alias}' differ only in case"
                )));
            }
        }
        if self.logging.level.parse::<Level>().is_err() {
            return Err(ConfigError::Message(format!(
                "logging.level must be one of debug, info, warn, error (got '{}')",
                self.logging.level
            )));
        }
        Ok(())
    }

    pub fn get_webhook_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.webhook.host, self.webhook.port)
            .parse()
            .map_err(|e| format!("Invalid webhook address: {e}"))
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self::from_toml_str("[bot]\ntoken = \"123:TEST\"\n").expect("minimal config parses")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply() {
        let cfg = Config::for_tests();
        assert_eq!(cfg.bot.api_url, "http://127.0.0.1:8081");
        assert_eq!(cfg.bot.mode, UpdateMode::Polling);
        assert_eq!(cfg.bot.poll_timeout, 30);
        assert_eq!(cfg.bot.max_file_size, 52_428_800);
        assert_eq!(cfg.webhook.path, "/telegram");
        assert_eq!(cfg.paths.mode, PathMode::Alias);
        assert!(cfg.paths.aliases.is_empty());
        assert!(cfg.access.allow_list.is_empty());
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.logging.access_log_format, "text");
        assert!(cfg.logging.log_file.is_none());
    }

    #[test]
    fn test_full_file() {
        let cfg = Config::from_toml_str(
            r#"
            [bot]
            token = "123:ABC"
            mode = "webhook"

            [webhook]
            port = 9000
            secret_token = "s3cret"

            [access]
            allow_list = [42, 1001]

            [paths]
            mode = "literal"

            [paths.aliases]
            me = "squire.log"
            flask = "myflaskapp/logs/errors.log"

            [logging]
            level = "debug"
            log_file = "squire.log"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.bot.mode, UpdateMode::Webhook);
        assert_eq!(cfg.webhook.port, 9000);
        assert_eq!(cfg.webhook.secret_token.as_deref(), Some("s3cret"));
        assert_eq!(cfg.access.allow_list, vec![42, 1001]);
        assert_eq!(cfg.paths.mode, PathMode::Literal);
        assert_eq!(cfg.paths.aliases.len(), 2);
        assert_eq!(cfg.logging.log_file.as_deref(), Some("squire.log"));
        assert_eq!(cfg.get_webhook_addr().unwrap().port(), 9000);
    }

    #[test]
    fn test_missing_token_rejected() {
        assert!(Config::from_toml_str("[logging]\nlevel = \"info\"\n").is_err());
        assert!(Config::from_toml_str("[bot]\ntoken = \"  \"\n").is_err());
    }

    #[test]
    fn test_https_api_url_rejected() {
        let err = Config::from_toml_str(
            "[bot]\ntoken = \"1:A\"\napi_url = \"https://api.telegram.org\"\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("http://"));
    }

    #[test]
    fn test_bad_level_rejected() {
        let toml = "[bot]\ntoken = \"1:A\"\n[logging]\nlevel = \"loud\"\n";
        assert!(Config::from_toml_str(toml).is_err());
    }

    #[test]
    fn test_aliases_differing_only_in_case_rejected() {
        let mut cfg = Config::for_tests();
        cfg.paths
            .aliases
            .insert("Me".to_string(), "squire.log".to_string());
        assert!(cfg.validate().is_ok());

        cfg.paths
            .aliases
            .insert("me".to_string(), "other.log".to_string());
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("differ only in case"));
    }

    #[test]
    fn test_bad_webhook_path_rejected() {
        let toml = "[bot]\ntoken = \"1:A\"\n[webhook]\npath = \"hook\"\n";
        assert!(Config::from_toml_str(toml).is_err());
    }
}

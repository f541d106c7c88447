//! # Configuration Module
//!
//! Runtime configuration for the helper bot, read from the environment
//! (optionally seeded from a `.env` file).

use std::env;
use std::path::PathBuf;

use crate::errors::HelpdeskError;

// Default locations of the report store and the resolved-issue area
pub const DEFAULT_REPORTS_DIR: &str = "reports";
pub const DEFAULT_SOLVED_DIR: &str = "solved";

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    /// Parse the `LOG_FORMAT` value
    pub fn parse(value: &str) -> Result<Self, HelpdeskError> {
        match value.trim().to_lowercase().as_str() {
            "" | "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(HelpdeskError::Config(format!(
                "unsupported LOG_FORMAT '{other}' (expected 'text' or 'json')"
            ))),
        }
    }
}

/// Configuration structure for the bot process
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Telegram bot API token
    pub bot_token: String,
    /// Directory receiving the daily category report files
    pub reports_dir: PathBuf,
    /// Directory holding externally resolved issue files
    pub solved_dir: PathBuf,
    /// Log output format
    pub log_format: LogFormat,
}

impl BotConfig {
    /// Load configuration from environment variables
    ///
    /// `TELEGRAM_BOT_TOKEN` is required; `REPORTS_DIR`, `SOLVED_DIR` and
    /// `LOG_FORMAT` fall back to their defaults.
    pub fn from_env() -> Result<Self, HelpdeskError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, HelpdeskError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bot_token = lookup("TELEGRAM_BOT_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| HelpdeskError::Config("TELEGRAM_BOT_TOKEN must be set".to_string()))?;

        let reports_dir = lookup("REPORTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORTS_DIR));
        let solved_dir = lookup("SOLVED_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SOLVED_DIR));
        let log_format = match lookup("LOG_FORMAT") {
            Some(value) => LogFormat::parse(&value)?,
            None => LogFormat::default(),
        };

        Ok(Self {
            bot_token,
            reports_dir,
            solved_dir,
            log_format,
        })
    }
}

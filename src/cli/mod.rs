//! CLI argument parsing types.
//!
//! This module provides the command-line interface for the homework-bot binary.
//! Every credential can come from a flag or from the environment (including a
//! `.env` file loaded by the binary).

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::{
    Config, DEFAULT_ENDPOINT, DEFAULT_TELEGRAM_API_URL, PRACTICUM_TOKEN_VAR,
    TELEGRAM_CHAT_ID_VAR, TELEGRAM_TOKEN_VAR,
};
use crate::error::Result;

/// Homework status bot command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "homework-bot",
    about = "Reports homework review status changes to Telegram",
    version
)]
pub struct Cli {
    /// OAuth token for the homework API.
    #[arg(long, env = PRACTICUM_TOKEN_VAR, hide_env_values = true)]
    pub practicum_token: Option<String>,

    /// Telegram bot token.
    #[arg(long, env = TELEGRAM_TOKEN_VAR, hide_env_values = true)]
    pub telegram_token: Option<String>,

    /// Chat receiving the notifications.
    #[arg(long, env = TELEGRAM_CHAT_ID_VAR)]
    pub chat_id: Option<String>,

    /// Homework status URL.
    #[arg(long, env = "PRACTICUM_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Telegram Bot API base URL.
    #[arg(long, env = "TELEGRAM_API_URL", default_value = DEFAULT_TELEGRAM_API_URL)]
    pub telegram_api_url: String,

    /// Seconds to wait between two polls.
    #[arg(long, default_value = "600", value_parser = clap::value_parser!(u64).range(1..))]
    pub retry_period: u64,

    /// Unix timestamp to start polling from (defaults to now).
    #[arg(long)]
    pub from_date: Option<i64>,

    /// Write logs to this file instead of stdout. The file is truncated on start.
    #[arg(long, env = "HOMEWORK_BOT_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Minimum log level.
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Run a single poll iteration and exit.
    #[arg(long, default_value = "false")]
    pub once: bool,
}

/// Log verbosity accepted on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

impl Cli {
    /// Build the validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::ConfigMissing`](crate::BotError::ConfigMissing) if
    /// any credential is absent or empty, or a URL error for bad overrides.
    pub fn config(&self) -> Result<Config> {
        Ok(Config::new(
            self.practicum_token.as_deref().unwrap_or_default(),
            self.telegram_token.as_deref().unwrap_or_default(),
            self.chat_id.as_deref().unwrap_or_default(),
        )?
        .with_endpoint(&self.endpoint)?
        .with_telegram_api_url(&self.telegram_api_url)?
        .with_retry_period(Duration::from_secs(self.retry_period)))
    }
}

//! Bot configuration.
//!
//! All process-wide settings live in [`Config`], built once at startup and
//! passed by reference to the client, the notifier and the poll loop.

use std::env;
use std::time::Duration;

use url::Url;

use crate::error::{BotError, Result};

/// Default homework status endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Default Telegram Bot API base URL.
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Default pause between two poll iterations.
pub const DEFAULT_RETRY_PERIOD: Duration = Duration::from_secs(600);

pub const PRACTICUM_TOKEN_VAR: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";

/// Validated bot configuration.
///
/// # Example
///
/// ```
/// use homework_bot::Config;
///
/// # fn example() -> homework_bot::Result<()> {
/// let config = Config::new("practicum-token", "telegram-token", "12345")?
///     .with_retry_period(std::time::Duration::from_secs(60));
/// assert_eq!(config.chat_id(), "12345");
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
#[derive(Clone)]
pub struct Config {
    practicum_token: String,
    telegram_token: String,
    chat_id: String,
    endpoint: Url,
    telegram_api_url: Url,
    retry_period: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("chat_id", &self.chat_id)
            .field("endpoint", &self.endpoint.as_str())
            .field("telegram_api_url", &self.telegram_api_url.as_str())
            .field("retry_period", &self.retry_period)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Create a configuration from the three credentials.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::ConfigMissing`] naming every credential that is
    /// empty or whitespace-only.
    pub fn new(practicum_token: &str, telegram_token: &str, chat_id: &str) -> Result<Self> {
        check_tokens([
            (PRACTICUM_TOKEN_VAR, practicum_token),
            (TELEGRAM_TOKEN_VAR, telegram_token),
            (TELEGRAM_CHAT_ID_VAR, chat_id),
        ])?;

        Ok(Self {
            practicum_token: practicum_token.trim().to_string(),
            telegram_token: telegram_token.trim().to_string(),
            chat_id: chat_id.trim().to_string(),
            endpoint: Url::parse(DEFAULT_ENDPOINT)?,
            telegram_api_url: Url::parse(DEFAULT_TELEGRAM_API_URL)?,
            retry_period: DEFAULT_RETRY_PERIOD,
        })
    }

    /// Create a configuration from environment variables.
    ///
    /// Reads `PRACTICUM_TOKEN`, `TELEGRAM_TOKEN` and `TELEGRAM_CHAT_ID`, plus the
    /// optional `PRACTICUM_ENDPOINT` and `TELEGRAM_API_URL` overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if a credential is missing or an override is not a URL.
    pub fn from_env() -> Result<Self> {
        let var = |name: &str| env::var(name).unwrap_or_default();
        let mut config = Self::new(
            &var(PRACTICUM_TOKEN_VAR),
            &var(TELEGRAM_TOKEN_VAR),
            &var(TELEGRAM_CHAT_ID_VAR),
        )?;

        if let Ok(endpoint) = env::var("PRACTICUM_ENDPOINT") {
            config = config.with_endpoint(&endpoint)?;
        }
        if let Ok(api_url) = env::var("TELEGRAM_API_URL") {
            config = config.with_telegram_api_url(&api_url)?;
        }

        Ok(config)
    }

    /// Override the homework status endpoint.
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self> {
        self.endpoint = Url::parse(endpoint)?;
        Ok(self)
    }

    /// Override the Telegram Bot API base URL.
    pub fn with_telegram_api_url(mut self, api_url: &str) -> Result<Self> {
        // Ensure base URL ends with /
        let api_url = if api_url.ends_with('/') {
            api_url.to_string()
        } else {
            format!("{api_url}/")
        };
        self.telegram_api_url = Url::parse(&api_url)?;
        Ok(self)
    }

    /// Override the pause between poll iterations.
    #[must_use]
    pub fn with_retry_period(mut self, retry_period: Duration) -> Self {
        self.retry_period = retry_period;
        self
    }

    pub fn practicum_token(&self) -> &str {
        &self.practicum_token
    }

    pub fn telegram_token(&self) -> &str {
        &self.telegram_token
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn telegram_api_url(&self) -> &Url {
        &self.telegram_api_url
    }

    pub fn retry_period(&self) -> Duration {
        self.retry_period
    }
}

/// Fail with every missing credential listed, in declaration order.
fn check_tokens(tokens: [(&'static str, &str); 3]) -> Result<()> {
    let missing: Vec<&str> = tokens
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        tracing::error!(missing = ?missing, "required credentials are not set");
        Err(BotError::ConfigMissing(missing.join(", ")))
    }
}

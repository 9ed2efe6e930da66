//! Homework API client.
//!
//! Low-level HTTP client for the single homework status endpoint. It only
//! guarantees a JSON body; shape checks live in [`crate::models`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use url::Url;

use crate::config::Config;
use crate::error::{BotError, Result};
use crate::traits::HomeworkSource;

const USER_AGENT: &str = concat!("homework-bot/", env!("CARGO_PKG_VERSION"));

/// Default timeout for every outbound request.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the homework status API.
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use homework_bot::{Config, HomeworkSource, PracticumClient};
///
/// # async fn example() -> homework_bot::Result<()> {
/// let config = Config::from_env()?;
/// let client = PracticumClient::from_config(&config)?;
///
/// let answer = client.get_api_answer(0).await?;
/// println!("{answer}");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct PracticumClient {
    http: Client,
    endpoint: Arc<Url>,
}

impl std::fmt::Debug for PracticumClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PracticumClient")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl PracticumClient {
    /// Create a client for the endpoint and token held by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.practicum_token(), config.endpoint().as_str())
    }

    /// Create a new client with the provided token and endpoint.
    ///
    /// # Arguments
    ///
    /// * `token` - Practicum OAuth token
    /// * `endpoint` - Full homework status URL
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a URL or the token cannot be
    /// used as a header value.
    pub fn new(token: &str, endpoint: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint)?;

        let mut auth = HeaderValue::from_str(&format!("OAuth {token}")).map_err(|_| {
            BotError::ConfigMissing("PRACTICUM_TOKEN contains invalid characters".to_string())
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(BotError::HttpError)?;

        Ok(Self {
            http,
            endpoint: Arc::new(endpoint),
        })
    }

    /// Get the endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Build the error for a non-200 answer.
    fn bad_status(&self, status: StatusCode) -> BotError {
        BotError::BadHttpStatus {
            message: format!(
                "{} - недоступен. Код ответа API: {}",
                self.endpoint,
                status.as_u16()
            ),
            status_code: Some(status.as_u16()),
        }
    }
}

#[async_trait]
impl HomeworkSource for PracticumClient {
    #[tracing::instrument(skip(self))]
    async fn get_api_answer(&self, from_date: i64) -> Result<Value> {
        let response = self
            .http
            .get(self.endpoint.as_str())
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(|e| BotError::BadHttpStatus {
                message: format!("Ошибка при запросе к API: {e}"),
                status_code: None,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(status = status.as_u16(), "homework API answered with unexpected status");
            return Err(self.bad_status(status));
        }

        let body = response.text().await.map_err(|e| BotError::BadHttpStatus {
            message: format!("Ошибка при чтении ответа API: {e}"),
            status_code: Some(status.as_u16()),
        })?;

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, "homework API answer is not JSON");
            BotError::InvalidJson(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_debug() {
        let client = PracticumClient::new("test-token", "https://example.com/api/").unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("PracticumClient"));
        assert!(debug.contains("endpoint"));
        // Token should not be in debug output
        assert!(!debug.contains("test-token"));
    }

    #[test]
    fn test_invalid_endpoint() {
        let err = PracticumClient::new("token", "no scheme here").unwrap_err();
        assert!(matches!(err, BotError::UrlError(_)));
    }

    #[test]
    fn test_bad_status_message_names_endpoint_and_code() {
        let client = PracticumClient::new("token", "https://example.com/api/").unwrap();
        let err = client.bad_status(StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            err.to_string(),
            "https://example.com/api/ - недоступен. Код ответа API: 503"
        );
        assert_eq!(err.status_code(), Some(503));
    }
}

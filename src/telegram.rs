//! Telegram Bot API notifier.
//!
//! Sends plain-text messages with `sendMessage`.
//! Docs: <https://core.telegram.org/bots/api#sendmessage>

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::client::REQUEST_TIMEOUT;
use crate::config::Config;
use crate::error::{BotError, Result};
use crate::traits::Notifier;

/// Body of a `sendMessage` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessage {
    pub chat_id: String,
    pub text: String,
}

/// Envelope of every Bot API answer.
#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Notifier posting to a single Telegram chat.
#[derive(Clone)]
pub struct TelegramNotifier {
    http: Client,
    send_url: Url,
    chat_id: String,
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The bot token is part of the URL path.
        f.debug_struct("TelegramNotifier")
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

impl TelegramNotifier {
    /// Create a notifier for the bot token, API base URL and chat in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the `sendMessage` URL cannot be built.
    pub fn new(config: &Config) -> Result<Self> {
        let send_url = config
            .telegram_api_url()
            .join(&format!("./bot{}/sendMessage", config.telegram_token()))?;

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(BotError::HttpError)?;

        Ok(Self {
            http,
            send_url,
            chat_id: config.chat_id().to_string(),
        })
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    async fn deliver(&self, text: &str) -> std::result::Result<(), String> {
        let body = SendMessage {
            chat_id: self.chat_id.clone(),
            text: text.to_string(),
        };

        let response = self
            .http
            .post(self.send_url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| e.without_url().to_string())?;

        let status = response.status();
        let answer: Option<TelegramResponse> = response.json().await.ok();

        match answer {
            Some(answer) if answer.ok && status.is_success() => Ok(()),
            Some(answer) => Err(answer
                .description
                .unwrap_or_else(|| format!("HTTP {status}"))),
            None => Err(format!("HTTP {status}")),
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    #[tracing::instrument(skip(self, text))]
    async fn send_message(&self, text: &str) -> Result<()> {
        tracing::info!(chat_id = %self.chat_id, "sending message to chat");

        match self.deliver(text).await {
            Ok(()) => {
                tracing::debug!(text, "message delivered");
                Ok(())
            }
            Err(cause) => {
                let err = BotError::SendMessage(cause);
                tracing::error!(error = %err, "message delivery failed");
                Err(err)
            }
        }
    }
}

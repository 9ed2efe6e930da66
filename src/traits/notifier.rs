//! Notifier trait for delivering chat messages.

use async_trait::async_trait;

use crate::error::Result;

/// Delivers text messages to a fixed destination.
///
/// # Example
///
/// ```ignore
/// use homework_bot::{Config, Notifier, TelegramNotifier};
///
/// let notifier = TelegramNotifier::new(&config)?;
/// notifier.send_message("Бот запущен").await?;
/// ```
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send `text` to the configured destination.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::SendMessage`](crate::BotError::SendMessage) if the
    /// message could not be delivered.
    async fn send_message(&self, text: &str) -> Result<()>;
}

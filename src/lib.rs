//! Homework status bot.
//!
//! Polls the Practicum homework status API and reports review status
//! changes of the newest submission to a Telegram chat.
//!
//! # Quick Start
//!
//! ```no_run
//! use homework_bot::{Bot, Config, PollState};
//!
//! #[tokio::main]
//! async fn main() -> homework_bot::Result<()> {
//!     // Fails before any network call if a credential is missing
//!     let config = Config::from_env()?;
//!
//!     let bot = Bot::from_config(&config)?;
//!     bot.run(PollState::starting_now()).await;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! The poll loop ([`Bot`]) depends on two traits:
//!
//! - [`HomeworkSource`] - Fetch the raw API answer for a `from_date`
//! - [`Notifier`] - Deliver a text message to the chat
//!
//! [`PracticumClient`] and [`TelegramNotifier`] are the production
//! implementations. Validation of the answer ([`check_response`]) and the
//! verdict text ([`parse_status`]) are plain functions over JSON values.
//!
//! # Configuration
//!
//! [`Config::from_env`] reads:
//!
//! - `PRACTICUM_TOKEN` (required) - OAuth token for the homework API
//! - `TELEGRAM_TOKEN` (required) - Telegram bot token
//! - `TELEGRAM_CHAT_ID` (required) - Chat receiving the notifications
//! - `PRACTICUM_ENDPOINT` (optional) - Homework status URL
//! - `TELEGRAM_API_URL` (optional) - Bot API base URL (defaults to `https://api.telegram.org`)

mod client;
mod config;
mod error;
mod models;
mod poll;
mod telegram;
mod traits;

pub mod cli;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use client::PracticumClient;
pub use config::{
    Config, DEFAULT_ENDPOINT, DEFAULT_RETRY_PERIOD, DEFAULT_TELEGRAM_API_URL,
    PRACTICUM_TOKEN_VAR, TELEGRAM_CHAT_ID_VAR, TELEGRAM_TOKEN_VAR,
};
pub use error::{BotError, Result};
pub use poll::{Bot, Outcome, PollState, FAILURE_PREFIX};
pub use telegram::{SendMessage, TelegramNotifier};

// Re-export traits
pub use traits::{HomeworkSource, Notifier};

// Re-export models
pub use models::{check_response, current_date, parse_status, Homework, HomeworkStatus};

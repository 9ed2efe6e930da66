//! Mock homework API and Telegram server for E2E testing.
//!
//! This module provides an in-memory server that simulates both the homework
//! status endpoint and the Telegram `sendMessage` method. Unlike wiremock
//! which mocks at the HTTP level per-test, this server keeps state across
//! requests, so a test can change homework statuses between poll iterations
//! and inspect every message the bot delivered.
//!
//! # Example
//!
//! ```ignore
//! use homework_bot::mock_server::MockServer;
//! use homework_bot::{Bot, PollState};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let bot = Bot::from_config(&server.config()).unwrap();
//!
//!     let mut state = PollState::new(0);
//!     bot.poll_once(&mut state).await;
//!
//!     assert_eq!(server.sent_texts().await.len(), 1);
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{Fixtures, BOT_TOKEN, CHAT_ID, PRACTICUM_TOKEN};
pub use server::{MockServer, HOMEWORK_PATH};
pub use state::{MockState, StoredHomework};

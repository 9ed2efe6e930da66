//! Mock server state management.
//!
//! Provides the in-memory data behind the mock homework API and the mock
//! Telegram Bot API.

use std::sync::Arc;

use serde_json::{json, Value};
use tokio::sync::RwLock;

use crate::SendMessage;

/// A homework record together with the time it was last updated.
#[derive(Debug, Clone)]
pub struct StoredHomework {
    /// Unix seconds; the API only returns records updated at or after `from_date`.
    pub date_updated: i64,
    /// The record exactly as served, so tests can store malformed ones.
    pub record: Value,
}

/// Shared state for the mock server.
///
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug, Default)]
pub struct MockState {
    /// Homework records in insertion order.
    pub homeworks: Vec<StoredHomework>,

    /// Value served as `current_date`. Omitted from answers when `None`.
    pub current_date: Option<i64>,

    /// If set, the homework endpoint answers with this status and no data.
    pub forced_status: Option<u16>,

    /// If set, the homework endpoint answers 200 with this raw body.
    pub raw_body: Option<String>,

    /// Optional OAuth token. If set, homework requests must carry it.
    pub required_token: Option<String>,

    /// Optional bot token. If set, `sendMessage` must be called with it.
    pub bot_token: Option<String>,

    /// Optional chat id. If set, messages to other chats are refused.
    pub known_chat: Option<String>,

    /// Every `from_date` the homework endpoint was called with.
    pub requests: Vec<i64>,

    /// Every message accepted by `sendMessage`.
    pub sent_messages: Vec<SendMessage>,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add a homework record updated at `date_updated`.
    pub fn with_homework(mut self, date_updated: i64, record: Value) -> Self {
        self.push_homework(date_updated, record);
        self
    }

    /// Set the `current_date` served with every answer.
    pub fn with_current_date(mut self, current_date: i64) -> Self {
        self.current_date = Some(current_date);
        self
    }

    /// Set the required OAuth token.
    pub fn with_required_token(mut self, token: &str) -> Self {
        self.required_token = Some(token.to_string());
        self
    }

    /// Set the bot token and chat accepted by `sendMessage`.
    pub fn with_bot(mut self, token: &str, chat_id: &str) -> Self {
        self.bot_token = Some(token.to_string());
        self.known_chat = Some(chat_id.to_string());
        self
    }

    /// Add a homework record in place.
    pub fn push_homework(&mut self, date_updated: i64, record: Value) {
        self.homeworks.push(StoredHomework {
            date_updated,
            record,
        });
    }

    /// Homework records updated at or after `from_date`, newest first.
    pub fn homeworks_since(&self, from_date: i64) -> Vec<Value> {
        let mut matching: Vec<&StoredHomework> = self
            .homeworks
            .iter()
            .filter(|h| h.date_updated >= from_date)
            .collect();
        matching.sort_by(|a, b| b.date_updated.cmp(&a.date_updated));
        matching.into_iter().map(|h| h.record.clone()).collect()
    }

    /// The JSON answer for a `from_date`.
    pub fn answer(&self, from_date: i64) -> Value {
        let mut answer = json!({ "homeworks": self.homeworks_since(from_date) });
        if let Some(current_date) = self.current_date {
            answer["current_date"] = json!(current_date);
        }
        answer
    }

    /// Texts of all accepted messages.
    pub fn sent_texts(&self) -> Vec<String> {
        self.sent_messages.iter().map(|m| m.text.clone()).collect()
    }
}

//! Test data fixtures for the mock server.
//!
//! Provides factory functions for realistic homework records.

use serde_json::{json, Value};

use crate::HomeworkStatus;

/// Token the default scenario expects on homework requests.
pub const PRACTICUM_TOKEN: &str = "test-practicum-token";

/// Bot token the default scenario expects on `sendMessage`.
pub const BOT_TOKEN: &str = "123456:test-bot-token";

/// Chat the default scenario accepts messages for.
pub const CHAT_ID: &str = "100500";

/// Collection of fixture factories for test data.
pub struct Fixtures;

impl Fixtures {
    /// A minimal record with the two fields the bot reads.
    pub fn minimal_homework(name: &str, status: HomeworkStatus) -> Value {
        json!({
            "homework_name": name,
            "status": status.as_str(),
        })
    }

    /// A record shaped like a real API answer.
    pub fn homework(id: u64, name: &str, status: HomeworkStatus) -> Value {
        json!({
            "id": id,
            "status": status.as_str(),
            "homework_name": name,
            "reviewer_comment": match status {
                HomeworkStatus::Rejected => "Поправьте, пожалуйста, обработку ошибок.",
                _ => "",
            },
            "date_updated": "2023-02-06T16:31:31Z",
            "lesson_name": "Итоговый проект",
        })
    }

    /// A record with an unknown status code.
    pub fn unknown_status_homework(name: &str) -> Value {
        json!({
            "homework_name": name,
            "status": "on_hold",
        })
    }

    /// A record missing `homework_name`.
    pub fn nameless_homework(status: HomeworkStatus) -> Value {
        json!({ "status": status.as_str() })
    }
}

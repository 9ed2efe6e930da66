//! Homework API payloads and their validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BotError, Result};

/// Review status of a homework submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HomeworkStatus {
    /// Reviewed and accepted.
    Approved,
    /// Taken for review.
    Reviewing,
    /// Reviewed with remarks.
    Rejected,
}

impl HomeworkStatus {
    /// All known statuses.
    pub const ALL: [HomeworkStatus; 3] = [Self::Approved, Self::Reviewing, Self::Rejected];

    /// The status code as it appears in the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Reviewing => "reviewing",
            Self::Rejected => "rejected",
        }
    }

    /// Display text for this status.
    pub fn verdict(&self) -> &'static str {
        match self {
            Self::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            Self::Reviewing => "Работа взята на проверку ревьюером.",
            Self::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HomeworkStatus {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| BotError::UnknownHomeworkStatus(s.to_string()))
    }
}

/// A single homework submission as returned by the API.
///
/// Only the fields the bot relies on are modelled; the API sends more.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Homework {
    /// Submission name, usually the reviewer's project path.
    pub homework_name: String,

    /// Review status.
    pub status: HomeworkStatus,
}

impl Homework {
    pub fn new(homework_name: impl Into<String>, status: HomeworkStatus) -> Self {
        Self {
            homework_name: homework_name.into(),
            status,
        }
    }

    /// Read a homework from a raw API record.
    ///
    /// # Errors
    ///
    /// - [`BotError::UnexpectedType`] if the record is not an object or a field is not a string
    /// - [`BotError::MissingKey`] if `homework_name` or `status` is absent
    /// - [`BotError::UnknownHomeworkStatus`] if the status is not a known one
    pub fn from_record(record: &Value) -> Result<Self> {
        let object = record.as_object().ok_or_else(|| {
            BotError::UnexpectedType(format!("запись о домашней работе не словарь: {record}"))
        })?;

        let homework_name = string_field(object, "homework_name")?;
        let status = string_field(object, "status")?.parse()?;

        Ok(Self::new(homework_name, status))
    }

    /// The chat message announcing this homework's status.
    pub fn verdict_message(&self) -> String {
        format!(
            "Изменился статус проверки работы \"{}\". {}",
            self.homework_name,
            self.status.verdict()
        )
    }
}

fn string_field<'a>(
    object: &'a serde_json::Map<String, Value>,
    key: &'static str,
) -> Result<&'a str> {
    object
        .get(key)
        .ok_or(BotError::MissingKey(key))?
        .as_str()
        .ok_or_else(|| BotError::UnexpectedType(format!("значение ключа \"{key}\" не строка")))
}

/// Check that an API answer has the documented shape and return its homeworks.
///
/// The list may be empty.
///
/// # Errors
///
/// - [`BotError::UnexpectedType`] if the answer is not an object or `homeworks` is not a list
/// - [`BotError::MissingKey`] if `homeworks` is absent
pub fn check_response(response: &Value) -> Result<&Vec<Value>> {
    let object = response
        .as_object()
        .ok_or_else(|| BotError::UnexpectedType(format!("ответ сервиса не словарь. {response}")))?;

    object
        .get("homeworks")
        .ok_or(BotError::MissingKey("homeworks"))?
        .as_array()
        .ok_or_else(|| {
            BotError::UnexpectedType("ответ сервиса по ключу homeworks не список".to_string())
        })
}

/// Turn one homework record into its verdict message.
pub fn parse_status(homework: &Value) -> Result<String> {
    Homework::from_record(homework).map(|h| h.verdict_message())
}

/// The server time of an API answer, if it carries an integral `current_date`.
pub fn current_date(response: &Value) -> Option<i64> {
    response.get("current_date").and_then(Value::as_i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_verdict_for_each_known_status() {
        let cases = [
            (
                "approved",
                "Изменился статус проверки работы \"hw1\". Работа проверена: ревьюеру всё понравилось. Ура!",
            ),
            (
                "reviewing",
                "Изменился статус проверки работы \"hw1\". Работа взята на проверку ревьюером.",
            ),
            (
                "rejected",
                "Изменился статус проверки работы \"hw1\". Работа проверена: у ревьюера есть замечания.",
            ),
        ];

        for (status, expected) in cases {
            let verdict = parse_status(&json!({"homework_name": "hw1", "status": status})).unwrap();
            assert_eq!(verdict, expected);
        }
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let err = parse_status(&json!({"homework_name": "hw1", "status": "pending"})).unwrap_err();
        assert!(matches!(err, BotError::UnknownHomeworkStatus(ref s) if s == "pending"));
    }

    #[test]
    fn test_missing_fields_are_key_errors() {
        let err = parse_status(&json!({"status": "approved"})).unwrap_err();
        assert!(matches!(err, BotError::MissingKey("homework_name")));

        let err = parse_status(&json!({"homework_name": "hw1"})).unwrap_err();
        assert!(matches!(err, BotError::MissingKey("status")));
    }

    #[test]
    fn test_non_string_status_is_type_error() {
        let err = parse_status(&json!({"homework_name": "hw1", "status": 1})).unwrap_err();
        assert!(matches!(err, BotError::UnexpectedType(_)));
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let homework = Homework::from_record(&json!({
            "id": 123,
            "homework_name": "user__hw_python_oop.zip",
            "status": "reviewing",
            "reviewer_comment": "",
            "date_updated": "2023-02-06T16:31:31Z",
            "lesson_name": "Итоговый проект"
        }))
        .unwrap();
        assert_eq!(homework, Homework::new("user__hw_python_oop.zip", HomeworkStatus::Reviewing));
    }

    #[test]
    fn test_check_response_rejects_bad_shapes() {
        let top_level_list = check_response(&json!([{"homeworks": []}])).unwrap_err();
        assert!(matches!(top_level_list, BotError::UnexpectedType(_)));

        let missing = check_response(&json!({"current_date": 1})).unwrap_err();
        assert!(matches!(missing, BotError::MissingKey("homeworks")));

        let string = check_response(&json!({"homeworks": "hw1"})).unwrap_err();
        assert!(matches!(string, BotError::UnexpectedType(_)));

        let record = check_response(&json!({"homeworks": {"homework_name": "hw1"}})).unwrap_err();
        assert!(matches!(record, BotError::UnexpectedType(_)));
    }

    #[test]
    fn test_check_response_accepts_empty_list() {
        let response = json!({"homeworks": [], "current_date": 1700000000});
        assert!(check_response(&response).unwrap().is_empty());
        assert_eq!(current_date(&response), Some(1700000000));
    }

    #[test]
    fn test_current_date_ignores_non_integers() {
        assert_eq!(current_date(&json!({"homeworks": []})), None);
        assert_eq!(current_date(&json!({"current_date": "soon"})), None);
    }

    #[test]
    fn test_status_serde_uses_api_codes() {
        let status: HomeworkStatus = serde_json::from_value(json!("rejected")).unwrap();
        assert_eq!(status, HomeworkStatus::Rejected);
        assert_eq!(serde_json::to_value(HomeworkStatus::Approved).unwrap(), json!("approved"));
    }
}

//! Error types for the homework bot.
//!
//! Display strings are what ends up in the chat when the poll loop reports
//! a failure, so they are written for the bot's audience.

use thiserror::Error;

/// Errors that can occur while polling the homework API or notifying the chat.
#[derive(Debug, Error)]
pub enum BotError {
    /// Required configuration is missing or empty.
    #[error("Отсутствуют переменные окружения: {0}")]
    ConfigMissing(String),

    /// The API request failed or answered with something other than 200.
    #[error("{message}")]
    BadHttpStatus {
        message: String,
        status_code: Option<u16>,
    },

    /// The API answered 200 but the body is not valid JSON.
    #[error("данные не являются допустимым форматом JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// HTTP client construction error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// A JSON value has the wrong shape.
    #[error("{0}")]
    UnexpectedType(String),

    /// A required key is absent from the API response.
    #[error("Отсутствует ключ \"{0}\" в ответе API")]
    MissingKey(&'static str),

    /// The homework status is not one of the known values.
    #[error("неожиданный статус домашней работы \"{0}\", обнаруженный в ответе API")]
    UnknownHomeworkStatus(String),

    /// Delivering a chat message failed.
    #[error("Ошибка при отправке сообщения в чат: {0}")]
    SendMessage(String),
}

impl BotError {
    /// Whether this error must stop the process instead of being absorbed
    /// by the poll loop.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ConfigMissing(_) | Self::UrlError(_))
    }

    /// HTTP status code attached to the error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::BadHttpStatus { status_code, .. } => *status_code,
            _ => None,
        }
    }
}

/// Result type alias for bot operations.
pub type Result<T> = core::result::Result<T, BotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_config_errors_are_fatal() {
        assert!(BotError::ConfigMissing("PRACTICUM_TOKEN".into()).is_fatal());
        assert!(!BotError::MissingKey("homeworks").is_fatal());
        assert!(!BotError::SendMessage("boom".into()).is_fatal());
    }

    #[test]
    fn test_bad_status_display_is_message() {
        let err = BotError::BadHttpStatus {
            message: "endpoint - недоступен. Код ответа API: 503".into(),
            status_code: Some(503),
        };
        assert_eq!(err.to_string(), "endpoint - недоступен. Код ответа API: 503");
        assert_eq!(err.status_code(), Some(503));
    }
}

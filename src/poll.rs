//! The polling loop.
//!
//! [`Bot`] fetches the homework API every retry period, turns the newest
//! homework into a verdict and forwards it to the chat. Every failure is
//! absorbed here: it is logged and reported to the chat once per distinct
//! message, and the loop carries on.

use std::time::Duration;

use crate::client::PracticumClient;
use crate::config::Config;
use crate::error::Result;
use crate::models::{check_response, current_date, parse_status};
use crate::telegram::TelegramNotifier;
use crate::traits::{HomeworkSource, Notifier};

/// Prefix of every failure report sent to the chat.
pub const FAILURE_PREFIX: &str = "Сбой в работе бота";

/// Loop-local state, created once at startup and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollState {
    since: i64,
    last_sent: Option<String>,
}

impl PollState {
    /// Start polling from `since` (Unix seconds) with nothing sent yet.
    pub fn new(since: i64) -> Self {
        Self {
            since,
            last_sent: None,
        }
    }

    /// Start polling from the current time.
    pub fn starting_now() -> Self {
        Self::new(chrono::Utc::now().timestamp())
    }

    /// Timestamp passed as `from_date` on the next fetch.
    pub fn since(&self) -> i64 {
        self.since
    }

    /// Last message successfully delivered to the chat.
    pub fn last_sent(&self) -> Option<&str> {
        self.last_sent.as_deref()
    }

    /// Whether `text` differs from the last delivered message.
    pub fn is_new(&self, text: &str) -> bool {
        self.last_sent.as_deref() != Some(text)
    }

    fn record_sent(&mut self, text: &str) {
        self.last_sent = Some(text.to_string());
    }
}

/// What a single iteration did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The homework list was empty.
    NoUpdates,
    /// The verdict matches the last delivered message.
    Unchanged,
    /// A new verdict was delivered.
    Notified(String),
    /// A new verdict could not be delivered; it is retried next iteration.
    DeliveryFailed(String),
    /// Fetching or parsing failed. `reported` tells whether the failure
    /// message reached the chat during this iteration.
    Failed { message: String, reported: bool },
}

/// Homework status bot.
///
/// Generic over its collaborators so the loop can run against canned
/// answers in tests.
#[derive(Debug)]
pub struct Bot<S, N> {
    source: S,
    notifier: N,
    retry_period: Duration,
}

impl Bot<PracticumClient, TelegramNotifier> {
    /// Build a bot talking to the real homework API and Telegram.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            PracticumClient::from_config(config)?,
            TelegramNotifier::new(config)?,
            config.retry_period(),
        ))
    }
}

impl<S: HomeworkSource, N: Notifier> Bot<S, N> {
    pub fn new(source: S, notifier: N, retry_period: Duration) -> Self {
        Self {
            source,
            notifier,
            retry_period,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Poll forever, sleeping the retry period after every iteration.
    pub async fn run(&self, mut state: PollState) {
        tracing::info!(
            since = state.since(),
            retry_period_secs = self.retry_period.as_secs(),
            "bot started"
        );

        loop {
            let outcome = self.poll_once(&mut state).await;
            tracing::debug!(?outcome, since = state.since(), "iteration finished");
            tokio::time::sleep(self.retry_period).await;
        }
    }

    /// Run one iteration and absorb its failures.
    #[tracing::instrument(skip(self, state), fields(since = state.since()))]
    pub async fn poll_once(&self, state: &mut PollState) -> Outcome {
        match self.check(state).await {
            Ok(None) => {
                tracing::debug!("homework list is empty, nothing to report");
                Outcome::NoUpdates
            }
            Ok(Some(verdict)) => match self.notify_if_new(state, &verdict).await {
                Ok(true) => {
                    tracing::info!(%verdict, "homework status changed");
                    Outcome::Notified(verdict)
                }
                Ok(false) => {
                    tracing::debug!("homework status unchanged");
                    Outcome::Unchanged
                }
                Err(error) => {
                    tracing::warn!(%error, "verdict not delivered, retrying next iteration");
                    Outcome::DeliveryFailed(verdict)
                }
            },
            Err(error) => {
                let message = format!("{FAILURE_PREFIX}: {error}");
                tracing::error!(status_code = ?error.status_code(), "{message}");

                // Delivery errors are logged, never reported.
                let reported = match self.notify_if_new(state, &message).await {
                    Ok(sent) => sent,
                    Err(error) => {
                        tracing::warn!(%error, "failure report not delivered");
                        false
                    }
                };
                Outcome::Failed { message, reported }
            }
        }
    }

    /// Fetch, validate and parse. Returns the verdict of the newest homework,
    /// or `None` when the list is empty.
    async fn check(&self, state: &mut PollState) -> Result<Option<String>> {
        let response = self.source.get_api_answer(state.since).await?;
        let homeworks = check_response(&response)?;

        if let Some(timestamp) = current_date(&response) {
            state.since = timestamp;
        }

        // The API lists the newest submission first.
        homeworks.first().map(parse_status).transpose()
    }

    /// Send `text` unless it was the last delivered message.
    async fn notify_if_new(&self, state: &mut PollState, text: &str) -> Result<bool> {
        if !state.is_new(text) {
            return Ok(false);
        }
        self.notifier.send_message(text).await?;
        state.record_sent(text);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BotError;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Source answering from a queue, then with an empty list once drained.
    struct ScriptedSource {
        answers: Mutex<VecDeque<Result<Value>>>,
        requested: Mutex<Vec<i64>>,
    }

    impl ScriptedSource {
        fn new(answers: Vec<Result<Value>>) -> Self {
            Self {
                answers: Mutex::new(answers.into()),
                requested: Mutex::new(Vec::new()),
            }
        }

        fn requested(&self) -> Vec<i64> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HomeworkSource for ScriptedSource {
        async fn get_api_answer(&self, from_date: i64) -> Result<Value> {
            self.requested.lock().unwrap().push(from_date);
            self.answers
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(json!({"homeworks": []})))
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<String>>,
        failing: Mutex<bool>,
    }

    impl RecordingNotifier {
        fn sent(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }

        fn set_failing(&self, failing: bool) {
            *self.failing.lock().unwrap() = failing;
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send_message(&self, text: &str) -> Result<()> {
            if *self.failing.lock().unwrap() {
                return Err(BotError::SendMessage("chat not found".to_string()));
            }
            self.sent.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn bot(answers: Vec<Result<Value>>) -> Bot<ScriptedSource, RecordingNotifier> {
        Bot::new(
            ScriptedSource::new(answers),
            RecordingNotifier::default(),
            Duration::from_millis(1),
        )
    }

    fn approved() -> Value {
        json!({
            "homeworks": [{"homework_name": "hw1", "status": "approved"}],
            "current_date": 1700000000
        })
    }

    const APPROVED_VERDICT: &str =
        "Изменился статус проверки работы \"hw1\". Работа проверена: ревьюеру всё понравилось. Ура!";

    #[tokio::test]
    async fn test_verdict_is_sent_and_since_advances() {
        let bot = bot(vec![Ok(approved())]);
        let mut state = PollState::new(1);

        let outcome = bot.poll_once(&mut state).await;

        assert_eq!(outcome, Outcome::Notified(APPROVED_VERDICT.to_string()));
        assert_eq!(state.since(), 1700000000);
        assert_eq!(state.last_sent(), Some(APPROVED_VERDICT));
        assert_eq!(bot.notifier().sent(), vec![APPROVED_VERDICT.to_string()]);
        assert_eq!(bot.source().requested(), vec![1]);
    }

    #[tokio::test]
    async fn test_identical_verdict_is_sent_once() {
        let bot = bot(vec![Ok(approved()), Ok(approved())]);
        let mut state = PollState::new(1);

        bot.poll_once(&mut state).await;
        let second = bot.poll_once(&mut state).await;

        assert_eq!(second, Outcome::Unchanged);
        assert_eq!(bot.notifier().sent().len(), 1);
        assert_eq!(bot.source().requested(), vec![1, 1700000000]);
    }

    #[tokio::test]
    async fn test_empty_list_sends_nothing() {
        let bot = bot(vec![Ok(json!({"homeworks": []}))]);
        let mut state = PollState::new(5);

        let outcome = bot.poll_once(&mut state).await;

        assert_eq!(outcome, Outcome::NoUpdates);
        assert_eq!(state.since(), 5);
        assert!(bot.notifier().sent().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_shape_error_is_reported_once() {
        let bot = bot(vec![Ok(json!({"items": []})), Ok(json!({"items": []}))]);
        let mut state = PollState::new(1);

        let first = bot.poll_once(&mut state).await;
        let second = bot.poll_once(&mut state).await;

        let expected = "Сбой в работе бота: Отсутствует ключ \"homeworks\" в ответе API".to_string();
        assert_eq!(
            first,
            Outcome::Failed {
                message: expected.clone(),
                reported: true
            }
        );
        assert_eq!(
            second,
            Outcome::Failed {
                message: expected.clone(),
                reported: false
            }
        );
        assert_eq!(bot.notifier().sent(), vec![expected]);
    }

    #[tokio::test]
    async fn test_bad_status_is_reported_with_code() {
        let bot = bot(vec![Err(BotError::BadHttpStatus {
            message: "https://example.com/ - недоступен. Код ответа API: 503".to_string(),
            status_code: Some(503),
        })]);
        let mut state = PollState::new(1);

        let outcome = bot.poll_once(&mut state).await;

        assert!(matches!(outcome, Outcome::Failed { reported: true, .. }));
        let sent = bot.notifier().sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].starts_with(FAILURE_PREFIX));
        assert!(sent[0].contains("503"));
        assert_eq!(state.since(), 1);
    }

    #[tokio::test]
    async fn test_since_advances_even_when_parsing_fails() {
        let bot = bot(vec![Ok(json!({
            "homeworks": [{"homework_name": "hw1", "status": "lost"}],
            "current_date": 42
        }))]);
        let mut state = PollState::new(1);

        let outcome = bot.poll_once(&mut state).await;

        assert!(matches!(outcome, Outcome::Failed { .. }));
        assert_eq!(state.since(), 42);
    }

    #[tokio::test]
    async fn test_delivery_failure_does_not_record_and_is_retried() {
        let bot = bot(vec![Ok(approved()), Ok(approved())]);
        let mut state = PollState::new(1);

        bot.notifier().set_failing(true);
        let first = bot.poll_once(&mut state).await;
        assert_eq!(first, Outcome::DeliveryFailed(APPROVED_VERDICT.to_string()));
        assert_eq!(state.last_sent(), None);
        assert!(bot.notifier().sent().is_empty());

        bot.notifier().set_failing(false);
        let second = bot.poll_once(&mut state).await;
        assert_eq!(second, Outcome::Notified(APPROVED_VERDICT.to_string()));
    }

    #[tokio::test]
    async fn test_failed_report_delivery_is_not_reported() {
        let bot = bot(vec![Ok(json!([]))]);
        let mut state = PollState::new(1);
        bot.notifier().set_failing(true);

        let outcome = bot.poll_once(&mut state).await;

        assert!(matches!(outcome, Outcome::Failed { reported: false, .. }));
        assert!(bot.notifier().sent().is_empty());
        assert_eq!(state.last_sent(), None);
    }

    #[tokio::test]
    async fn test_status_change_after_error_is_sent() {
        let rejected = json!({"homeworks": [{"homework_name": "hw1", "status": "rejected"}]});
        let bot = bot(vec![Ok(approved()), Ok(json!("oops")), Ok(rejected), Ok(approved())]);
        let mut state = PollState::new(1);

        for _ in 0..4 {
            bot.poll_once(&mut state).await;
        }

        let sent = bot.notifier().sent();
        assert_eq!(sent.len(), 4);
        assert_eq!(sent[0], APPROVED_VERDICT);
        assert!(sent[1].starts_with(FAILURE_PREFIX));
        assert!(sent[2].ends_with("Работа проверена: у ревьюера есть замечания."));
        assert_eq!(sent[3], APPROVED_VERDICT);
    }

    #[tokio::test]
    async fn test_run_keeps_polling_without_duplicates() {
        let bot = bot(vec![Ok(approved()), Ok(approved()), Ok(approved())]);

        let result =
            tokio::time::timeout(Duration::from_millis(200), bot.run(PollState::new(1))).await;

        assert!(result.is_err(), "run should never return");
        assert!(bot.source().requested().len() > 3);
        assert_eq!(bot.notifier().sent(), vec![APPROVED_VERDICT.to_string()]);
    }
}

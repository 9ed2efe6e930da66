//! Mock homework API and Telegram server.
//!
//! Provides an axum-based HTTP server that serves both APIs on one port.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::{Fixtures, BOT_TOKEN, CHAT_ID, PRACTICUM_TOKEN};
use super::handlers;
use super::state::MockState;
use crate::{Config, HomeworkStatus};

/// Path of the homework status endpoint.
pub const HOMEWORK_PATH: &str = "/api/user_api/homework_statuses/";

/// A mock server for testing the bot end to end.
///
/// The server runs in the background until [`MockServer::shutdown`] is
/// called or the value is dropped with its task still running.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with the default scenario.
    ///
    /// The scenario requires the fixture tokens, accepts messages for
    /// [`CHAT_ID`], serves `current_date = 1700000000` and holds one
    /// approved homework updated at that time.
    pub async fn start() -> Self {
        Self::with_state(Self::default_state()).await
    }

    /// Start a mock server with empty state.
    ///
    /// No authentication, no homeworks, no `current_date`.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self {
            url: format!("http://{}", addr),
            handle,
            state: shared_state,
        }
    }

    /// Get the base URL of the mock server.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Full URL of the homework status endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.url, HOMEWORK_PATH)
    }

    /// A bot configuration pointing both APIs at this server, using the
    /// fixture credentials.
    pub fn config(&self) -> Config {
        Config::new(PRACTICUM_TOKEN, BOT_TOKEN, CHAT_ID)
            .and_then(|c| c.with_endpoint(&self.endpoint()))
            .and_then(|c| c.with_telegram_api_url(&self.url))
            .expect("mock server URL is valid")
    }

    /// Get access to the server's shared state.
    ///
    /// This allows modifying the mock data during a test.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Texts of all messages delivered so far.
    pub async fn sent_texts(&self) -> Vec<String> {
        self.state.read().await.sent_texts()
    }

    /// Every `from_date` the homework endpoint has been called with.
    pub async fn requests(&self) -> Vec<i64> {
        self.state.read().await.requests.clone()
    }

    /// Shutdown the server.
    ///
    /// This aborts the server task. It's safe to call multiple times.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    /// Create the default state with common test fixtures.
    fn default_state() -> MockState {
        MockState::new()
            .with_required_token(PRACTICUM_TOKEN)
            .with_bot(BOT_TOKEN, CHAT_ID)
            .with_current_date(1_700_000_000)
            .with_homework(
                1_700_000_000,
                Fixtures::homework(1, "hw1", HomeworkStatus::Approved),
            )
    }

    /// Create the axum router with all routes.
    fn create_router(state: Arc<RwLock<MockState>>) -> Router {
        Router::new()
            // Homework API
            .route(HOMEWORK_PATH, get(handlers::get_homework_statuses))
            // Telegram Bot API
            .route("/:bot_path/sendMessage", post(handlers::send_message))
            // Health check
            .route("/health", get(health_check))
            .with_state(state)
    }
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}

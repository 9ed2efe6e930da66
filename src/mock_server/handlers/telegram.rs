//! Telegram `sendMessage` handler.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tokio::sync::RwLock;

use crate::mock_server::state::MockState;
use crate::SendMessage;

/// POST /bot{token}/sendMessage
pub async fn send_message(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(bot_path): Path<String>,
    Json(message): Json<SendMessage>,
) -> impl IntoResponse {
    let mut state = state.write().await;

    let token = bot_path.strip_prefix("bot");
    let authorized = match (&state.bot_token, token) {
        (Some(expected), Some(token)) => expected == token,
        (None, Some(_)) => true,
        (_, None) => false,
    };
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({
                "ok": false,
                "error_code": 401,
                "description": "Unauthorized"
            })),
        )
            .into_response();
    }

    if let Some(ref chat) = state.known_chat {
        if *chat != message.chat_id {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "ok": false,
                    "error_code": 400,
                    "description": "Bad Request: chat not found"
                })),
            )
                .into_response();
        }
    }

    state.sent_messages.push(message.clone());
    let message_id = state.sent_messages.len();

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "ok": true,
            "result": {
                "message_id": message_id,
                "chat": {"id": message.chat_id},
                "text": message.text
            }
        })),
    )
        .into_response()
}

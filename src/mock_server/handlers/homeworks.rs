//! Homework status endpoint handler.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use tokio::sync::RwLock;

use crate::mock_server::state::MockState;

/// GET /api/user_api/homework_statuses/
pub async fn get_homework_statuses(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let mut state = state.write().await;

    if let Some(ref token) = state.required_token {
        let expected = format!("OAuth {token}");
        let provided = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        if provided != Some(expected.as_str()) {
            return (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({
                    "code": "not_authenticated",
                    "message": "Учетные данные не были предоставлены.",
                    "source": "__response__"
                })),
            )
                .into_response();
        }
    }

    let from_date = match query.get("from_date").map(|v| v.parse::<i64>()) {
        Some(Ok(from_date)) => from_date,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": {"error": "Wrong from_date format"},
                    "code": "UnknownError",
                    "source": "__response__"
                })),
            )
                .into_response();
        }
    };
    state.requests.push(from_date);

    if let Some(code) = state.forced_status {
        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, "forced failure").into_response();
    }

    if let Some(ref body) = state.raw_body {
        return (StatusCode::OK, body.clone()).into_response();
    }

    (StatusCode::OK, Json(state.answer(from_date))).into_response()
}

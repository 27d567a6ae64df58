//! `POST /chat`: run one turn for the caller's session.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use serde::Serialize;

use crate::http::error::AppError;
use crate::state::AppState;

/// Header carrying the caller's session id.
pub const SESSION_HEADER: &str = "x-session-id";

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
}

/// Extract `message` from a request body.
///
/// An unparseable body, a missing field or a non-string value all yield "".
pub fn message_from_body(body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_default()
}

/// Session id from `x-session-id`; absent or empty means anonymous.
///
/// Header bytes map one-to-one onto chars, so ids outside visible ASCII
/// stay distinct instead of falling back to the anonymous session.
fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(SESSION_HEADER)
        .map(|v| v.as_bytes().iter().map(|&b| char::from(b)).collect::<String>())
        .filter(|id| !id.is_empty())
}

/// POST /chat
pub async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ChatReply>, AppError> {
    let message = message_from_body(&body);
    let reply = state
        .manager
        .handle_turn(session_id(&headers).as_deref(), &message)
        .await?;

    Ok(Json(ChatReply { reply }))
}

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::AppState;

const WEB_ROOM: &str = "web-chat";
const DEFAULT_USER: &str = "web-user";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Missing and `null` are both treated as empty.
    #[serde(default)]
    pub message: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatError {
    pub error: String,
    pub success: bool,
}

type ChatResult = Result<Json<ChatResponse>, (StatusCode, Json<ChatError>)>;

fn chat_error(status: StatusCode, message: &str) -> (StatusCode, Json<ChatError>) {
    (
        status,
        Json(ChatError {
            error: message.to_string(),
            success: false,
        }),
    )
}

pub async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ChatResult {
    let Json(request) = payload.map_err(|e| {
        error!("Error parsing chat request: {}", e);
        chat_error(StatusCode::BAD_REQUEST, "Invalid JSON")
    })?;

    let message = request.message.as_deref().unwrap_or_default();
    if message.trim().is_empty() {
        return Err(chat_error(StatusCode::BAD_REQUEST, "Message is required"));
    }

    if !state.runtime.is_ready() {
        return Err(chat_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Agent runtime not initialized",
        ));
    }

    let user_id = request.user_id.as_deref().unwrap_or(DEFAULT_USER);
    info!("Processing message from {}: {}", user_id, message);

    let response = state.runtime.respond(user_id, WEB_ROOM, message).await;

    Ok(Json(ChatResponse {
        response,
        success: true,
    }))
}

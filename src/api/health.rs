use axum::{extract::State, response::IntoResponse, Json};
use chrono::{SecondsFormat, Utc};

use crate::AppState;

pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "elizaReady": state.runtime.is_ready(),
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}

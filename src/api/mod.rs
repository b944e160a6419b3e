//! # API Module
//!
//! HTTP façade over the agent runtime.
//!
//! ## Endpoints
//! - `POST /api/chat` - Send a message to the agent
//! - `GET /api/health` - Check server status

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub mod chat;
pub mod health;

/// Builds the full application router.
pub fn create_router(state: AppState) -> Router {
    let api_router = Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/chat",
            post(chat::chat_handler).fallback(method_not_allowed),
        );

    Router::new()
        .nest("/api", api_router)
        .fallback(not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}

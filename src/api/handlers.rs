// src/api/handlers.rs

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::api::validation::ValidationError;
use crate::api::{types::*, ApiState};
use crate::core::ProcessResult;

fn bad_request(e: ValidationError) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

/// POST /api/chat - Process one user message.
///
/// Unreadable bodies (wrong content type, malformed or non-object JSON) get
/// the same 400 as a bad `message` field.
pub async fn chat(
    State(state): State<ApiState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ProcessResult>, (StatusCode, Json<ErrorResponse>)> {
    let Json(body) = body.map_err(|rejection| {
        tracing::debug!("Chat body rejected: {}", rejection.body_text());
        bad_request(ValidationError::InvalidFormat)
    })?;

    let chat = state
        .validator
        .validate(&body.message, &body.session_id)
        .map_err(bad_request)?;

    let result = state
        .orchestrator
        .process(&chat.message, chat.session_id.as_deref())
        .await;
    Ok(Json(result))
}

/// GET /api/health - Liveness check.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".into(),
        message: "Yaşar Üniversitesi Yapay Zeka Asistanı çalışıyor".into(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

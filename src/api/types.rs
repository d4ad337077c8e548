// src/api/types.rs

use serde::{Deserialize, Serialize};

use crate::core::ProcessResult;

/// Chat payload as sent by clients. Fields stay untyped until validated
/// so wrong types get a proper error message instead of a 422.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: serde_json::Value,
    #[serde(default, rename = "sessionId")]
    pub session_id: serde_json::Value,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub timestamp: String,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Server-to-client event on the push channel.
#[derive(Debug, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum SocketEvent {
    ReceiveMessage(ProcessResult),
    Error { message: String },
}

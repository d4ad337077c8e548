// src/api/socket.rs - WebSocket push channel

use axum::extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use serde_json::Value;

use crate::api::types::{ChatRequest, SocketEvent};
use crate::api::validation::ValidationError;
use crate::api::ApiState;

/// GET /api/ws - Upgrade to a WebSocket. Each text frame carries a chat
/// payload and is answered with one event.
pub async fn upgrade(State(state): State<ApiState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| serve_socket(socket, state))
}

async fn serve_socket(mut socket: WebSocket, state: ApiState) {
    let conn_id = uuid::Uuid::new_v4();
    tracing::info!(%conn_id, "Socket connected");

    while let Some(frame) = socket.recv().await {
        let text = match frame {
            Ok(WsMessage::Text(text)) => text,
            Ok(WsMessage::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                tracing::debug!(%conn_id, "Socket receive error: {}", e);
                break;
            }
        };

        let event = handle_frame(&state, text.as_str()).await;
        let payload = match serde_json::to_string(&event) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(%conn_id, "Failed to encode socket event: {}", e);
                continue;
            }
        };
        if socket.send(WsMessage::Text(payload.into())).await.is_err() {
            break;
        }
    }

    tracing::info!(%conn_id, "Socket disconnected");
}

/// Turn one inbound frame into the event sent back.
pub async fn handle_frame(state: &ApiState, frame: &str) -> SocketEvent {
    let request: ChatRequest = match serde_json::from_str(frame) {
        Ok(r) => r,
        Err(_) => {
            return SocketEvent::Error {
                message: ValidationError::InvalidFormat.to_string(),
            }
        }
    };

    // The push channel reports a missing or empty message as empty, not
    // as a format error.
    if is_absent(&request.message) {
        return SocketEvent::Error {
            message: ValidationError::Empty.to_string(),
        };
    }

    match state.validator.validate(&request.message, &request.session_id) {
        Ok(chat) => {
            let result = state
                .orchestrator
                .process(&chat.message, chat.session_id.as_deref())
                .await;
            SocketEvent::ReceiveMessage(result)
        }
        Err(e) => SocketEvent::Error {
            message: e.to_string(),
        },
    }
}

fn is_absent(message: &Value) -> bool {
    match message {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

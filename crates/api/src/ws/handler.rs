use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use letssee_core::error::CoreError;
use letssee_core::types::UserId;
use serde::Deserialize;

use crate::error::AppError;
use crate::middleware::auth::authenticate;
use crate::state::AppState;
use crate::ws::manager::WsManager;

/// Query string for the upgrade request. Browsers cannot set headers on a
/// WebSocket handshake, so the access token travels as `?token=`.
#[derive(Debug, Deserialize)]
pub struct WsParams {
    pub token: Option<String>,
}

/// GET /api/v1/ws?token=
///
/// Authenticates the token before upgrading; an invalid token is rejected
/// with 401 and no connection is registered.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(params): Query<WsParams>,
) -> Result<impl IntoResponse, AppError> {
    let token = params
        .token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Missing access token".into())))?;
    let auth = authenticate(&token, &state)?;

    let manager = Arc::clone(&state.ws_manager);
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, manager, auth.user_id)))
}

/// Manage a single WebSocket connection after upgrade.
///
/// Registers the connection, forwards queued messages from the manager
/// channel on a sender task, drains inbound frames until the client leaves,
/// then unregisters.
async fn handle_socket(socket: WebSocket, ws_manager: Arc<WsManager>, user_id: UserId) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, %user_id, "WebSocket connected");

    let mut rx = ws_manager.add(conn_id.clone(), Some(user_id)).await;

    let (mut sink, mut stream) = socket.split();

    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let closing = matches!(msg, Message::Close(_));
            if sink.send(msg).await.is_err() || closing {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    // Clients only receive; inbound frames other than Close are ignored.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, %user_id, "WebSocket disconnected");
}

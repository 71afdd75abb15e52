use axum::routing::{get, post};
use axum::Router;

use crate::handlers::messages;
use crate::state::AppState;

/// Messaging routes mounted at `/messages`.
///
/// ```text
/// POST /                       -> send_message
/// GET  /conversations          -> conversations
/// GET  /unread-count           -> unread_count
/// GET  /with/{user_id}         -> thread
/// POST /with/{user_id}/read    -> mark_read
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(messages::send_message))
        .route("/conversations", get(messages::conversations))
        .route("/unread-count", get(messages::unread_count))
        .route("/with/{user_id}", get(messages::thread))
        .route("/with/{user_id}/read", post(messages::mark_read))
}

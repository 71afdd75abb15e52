use axum::routing::{get, post};
use axum::Router;

use crate::handlers::follows;
use crate::state::AppState;

/// Follow routes mounted at `/follows`.
///
/// ```text
/// POST   /{user_id}  -> follow
/// DELETE /{user_id}  -> unfollow
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{user_id}",
        post(follows::follow).delete(follows::unfollow),
    )
}

/// Pending request routes mounted at `/follow-requests`.
///
/// ```text
/// GET  /incoming       -> incoming_requests
/// GET  /outgoing       -> outgoing_requests
/// POST /{id}/accept    -> accept_request
/// POST /{id}/decline   -> decline_request
/// ```
pub fn requests_router() -> Router<AppState> {
    Router::new()
        .route("/incoming", get(follows::incoming_requests))
        .route("/outgoing", get(follows::outgoing_requests))
        .route("/{id}/accept", post(follows::accept_request))
        .route("/{id}/decline", post(follows::decline_request))
}

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::preferences;
use crate::state::AppState;

/// Preference routes mounted at `/preferences`.
///
/// ```text
/// POST   /toggle                       -> toggle
/// GET    /{media_type}/{id}            -> get_state
/// PUT    /{media_type}/{id}/{kind}     -> enable
/// DELETE /{media_type}/{id}/{kind}     -> disable
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/toggle", post(preferences::toggle))
        .route("/{media_type}/{id}", get(preferences::get_state))
        .route(
            "/{media_type}/{id}/{kind}",
            put(preferences::enable).delete(preferences::disable),
        )
}

/// The caller's collections, mounted at `/library`.
///
/// ```text
/// GET /{kind}  -> my_library
/// ```
pub fn library_router() -> Router<AppState> {
    Router::new().route("/{kind}", get(preferences::my_library))
}

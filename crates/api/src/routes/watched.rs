use axum::routing::get;
use axum::Router;

use crate::handlers::watched;
use crate::state::AppState;

/// Watched details mounted at `/watched`.
///
/// ```text
/// GET /{media_type}/{id}  -> get_watched
/// PUT /{media_type}/{id}  -> update_watched
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{media_type}/{id}",
        get(watched::get_watched).put(watched::update_watched),
    )
}

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::episodes;
use crate::state::AppState;

/// Episode progress mounted at `/shows`.
///
/// ```text
/// GET    /{show_id}/episodes                      -> list_episodes
/// POST   /{show_id}/episodes                      -> mark_episode
/// DELETE /{show_id}/episodes/{season}/{episode}   -> unmark_episode
/// POST   /{show_id}/backfill                      -> backfill
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{show_id}/episodes",
            get(episodes::list_episodes).post(episodes::mark_episode),
        )
        .route(
            "/{show_id}/episodes/{season}/{episode}",
            delete(episodes::unmark_episode),
        )
        .route("/{show_id}/backfill", post(episodes::backfill))
}

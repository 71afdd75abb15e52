//! Route definitions for catalog reads (no auth required).

use axum::routing::get;
use axum::Router;

use crate::handlers::{media, search};
use crate::state::AppState;

/// Search, discover and trending, mounted at the API root.
///
/// ```text
/// GET /search                  -> search
/// GET /discover/{media_type}   -> discover
/// GET /trending/{media_type}   -> trending
/// ```
pub fn listings_router() -> Router<AppState> {
    Router::new()
        .route("/search", get(search::search))
        .route("/discover/{media_type}", get(search::discover))
        .route("/trending/{media_type}", get(search::trending))
}

/// Title pages mounted at `/media`.
///
/// ```text
/// GET /{media_type}/{id}                   -> get_media
/// GET /{media_type}/{id}/reviews           -> list_reviews
/// GET /{media_type}/{id}/seasons/{season}  -> get_season
/// ```
pub fn media_router() -> Router<AppState> {
    Router::new()
        .route("/{media_type}/{id}", get(media::get_media))
        .route("/{media_type}/{id}/reviews", get(media::list_reviews))
        .route("/{media_type}/{id}/seasons/{season}", get(media::get_season))
}

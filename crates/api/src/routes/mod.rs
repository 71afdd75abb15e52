pub mod catalog;
pub mod follows;
pub mod health;
pub mod lists;
pub mod messages;
pub mod preferences;
pub mod shows;
pub mod users;
pub mod watched;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                              WebSocket (?token=)
///
/// /search                                          catalog search (public)
/// /discover/{media_type}                           discover listing (public)
/// /trending/{media_type}                           trending listing (public)
/// /media/{media_type}/{id}                         details + credits + providers
/// /media/{media_type}/{id}/reviews                 public reviews
/// /media/{media_type}/{id}/seasons/{season}        season with episodes
///
/// /preferences/toggle                              toggle a collection (POST)
/// /preferences/{media_type}/{id}                   membership state
/// /preferences/{media_type}/{id}/{kind}            enable (PUT), disable (DELETE)
/// /library/{kind}                                  own collection
///
/// /watched/{media_type}/{id}                       rating, diary, review (GET, PUT)
///
/// /shows/{show_id}/episodes                        list, mark
/// /shows/{show_id}/episodes/{season}/{episode}     unmark
/// /shows/{show_id}/backfill                        bulk mark (POST)
///
/// /lists                                           list own, create
/// /lists/{id}                                      get, update, delete
/// /lists/{id}/items                                add item
/// /lists/{id}/items/{media_type}/{tmdb_id}         remove item
///
/// /follows/{user_id}                               follow, unfollow
/// /follow-requests/incoming|outgoing               pending requests
/// /follow-requests/{id}/accept|decline             respond (target only)
///
/// /messages                                        send
/// /messages/conversations                          inbox
/// /messages/unread-count                           unread total
/// /messages/with/{user_id}                         thread (?before=)
/// /messages/with/{user_id}/read                    mark read (POST)
///
/// /profile                                         own profile (GET, PUT)
/// /users/{username}                                profile page
/// /users/{user_id}/library/{kind}                  library listing
/// /users/{user_id}/lists                           visible lists
/// /users/{user_id}/followers|following             social listings
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Realtime push.
        .route("/ws", get(ws::ws_handler))
        // Catalog reads.
        .merge(catalog::listings_router())
        .nest("/media", catalog::media_router())
        // Personal collections.
        .nest("/preferences", preferences::router())
        .nest("/library", preferences::library_router())
        .nest("/watched", watched::router())
        .nest("/shows", shows::router())
        // Lists.
        .nest("/lists", lists::router())
        // Social graph and messaging.
        .nest("/follows", follows::router())
        .nest("/follow-requests", follows::requests_router())
        .nest("/messages", messages::router())
        // Profiles.
        .nest("/profile", users::profile_router())
        .nest("/users", users::users_router())
}

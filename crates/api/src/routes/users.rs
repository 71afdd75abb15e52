use axum::routing::get;
use axum::Router;

use crate::handlers::{follows, profiles};
use crate::state::AppState;

/// Own profile mounted at `/profile`.
///
/// ```text
/// GET /  -> get_profile
/// PUT /  -> update_profile
/// ```
pub fn profile_router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(profiles::get_profile).put(profiles::update_profile),
    )
}

/// Other users mounted at `/users`. Readable anonymously.
///
/// The profile page is addressed by username; everything below it by id.
///
/// ```text
/// GET /{user}                    -> get_user_profile (username)
/// GET /{user}/library/{kind}     -> get_user_library (user id)
/// GET /{user}/lists              -> get_user_lists
/// GET /{user}/followers          -> followers
/// GET /{user}/following          -> following
/// ```
pub fn users_router() -> Router<AppState> {
    Router::new()
        .route("/{user}", get(profiles::get_user_profile))
        .route("/{user}/library/{kind}", get(profiles::get_user_library))
        .route("/{user}/lists", get(profiles::get_user_lists))
        .route("/{user}/followers", get(follows::followers))
        .route("/{user}/following", get(follows::following))
}

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::lists;
use crate::state::AppState;

/// List routes mounted at `/lists`.
///
/// ```text
/// GET    /                                      -> my_lists
/// POST   /                                      -> create_list
/// GET    /{id}                                  -> get_list
/// PUT    /{id}                                  -> update_list
/// DELETE /{id}                                  -> delete_list
/// POST   /{id}/items                            -> add_item
/// DELETE /{id}/items/{media_type}/{tmdb_id}     -> remove_item
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(lists::my_lists).post(lists::create_list))
        .route(
            "/{id}",
            get(lists::get_list)
                .put(lists::update_list)
                .delete(lists::delete_list),
        )
        .route("/{id}/items", post(lists::add_item))
        .route("/{id}/items/{media_type}/{tmdb_id}", delete(lists::remove_item))
}

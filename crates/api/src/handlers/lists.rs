//! Custom user lists.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use letssee_core::error::CoreError;
use letssee_core::lists::{normalize_description, normalize_list_name, MAX_LIST_ITEMS};
use letssee_core::media::MediaKey;
use letssee_core::types::{DbId, UserId};
use letssee_db::models::list::{CreateList, UpdateList, UserList, UserListWithItems};
use letssee_db::repositories::ListRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::AppResult;
use crate::handlers::{double_option, ensure_profile, MediaRef};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateListRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateListRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    /// `null` clears the description; absent keeps it.
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub is_public: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddItemRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub media: MediaRef,
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

// ---------------------------------------------------------------------------
// Lists
// ---------------------------------------------------------------------------

/// POST /api/v1/lists
pub async fn create_list(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateListRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let create = CreateList {
        name: normalize_list_name(&input.name)?,
        description: normalize_description(input.description.as_deref())?,
        is_public: input.is_public,
    };

    ensure_profile(&state, auth.user_id).await?;
    let list = ListRepo::create(&state.pool, auth.user_id, &create).await?;

    tracing::info!(user_id = %auth.user_id, list_id = list.id, "List created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: list })))
}

/// GET /api/v1/lists
///
/// All of the caller's lists, private ones included.
pub async fn my_lists(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let lists = ListRepo::list_for_user(&state.pool, auth.user_id, true).await?;
    Ok(Json(DataResponse { data: lists }))
}

/// GET /api/v1/lists/{id}
///
/// Readable by the owner, or by anyone when public. A private list read by
/// someone else is reported as missing.
pub async fn get_list(
    auth: Option<AuthUser>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let viewer = auth.map(|a| a.user_id);
    let list = find_list(&state, id).await?;
    if !list.is_public && viewer != Some(list.user_id) {
        return Err(not_found(id).into());
    }

    let items = ListRepo::items(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: UserListWithItems { list, items },
    }))
}

/// PUT /api/v1/lists/{id}
pub async fn update_list(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateListRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let list = find_list(&state, id).await?;
    require_owner(&list, auth.user_id)?;

    let update = UpdateList {
        name: input.name.as_deref().map(normalize_list_name).transpose()?,
        description: match input.description {
            None => None,
            Some(raw) => Some(normalize_description(raw.as_deref())?),
        },
        is_public: input.is_public,
    };

    let list = ListRepo::update(&state.pool, id, &update)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(user_id = %auth.user_id, list_id = id, "List updated");

    Ok(Json(DataResponse { data: list }))
}

/// DELETE /api/v1/lists/{id}
///
/// A profile featuring this list loses the pointer.
pub async fn delete_list(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let list = find_list(&state, id).await?;
    require_owner(&list, auth.user_id)?;

    if ListRepo::delete(&state.pool, id).await? {
        tracing::info!(user_id = %auth.user_id, list_id = id, "List deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id).into())
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// POST /api/v1/lists/{id}/items
///
/// Appends at the end. Adding a title already in the list returns the
/// existing item.
pub async fn add_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AddItemRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let key = input.media.key()?;
    let snapshot = input.media.snapshot()?;
    let note = input
        .note
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());

    let list = find_list(&state, id).await?;
    require_owner(&list, auth.user_id)?;

    if !ListRepo::contains(&state.pool, id, key).await?
        && ListRepo::count_items(&state.pool, id).await? >= MAX_LIST_ITEMS
    {
        return Err(CoreError::Validation(format!(
            "A list can hold at most {MAX_LIST_ITEMS} titles"
        ))
        .into());
    }

    let item = ListRepo::add_item(&state.pool, id, key, &snapshot, note).await?;

    tracing::info!(user_id = %auth.user_id, list_id = id, media = %key, "List item added");

    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// DELETE /api/v1/lists/{id}/items/{media_type}/{tmdb_id}
pub async fn remove_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, media_type, tmdb_id)): Path<(DbId, String, i64)>,
) -> AppResult<StatusCode> {
    let key = MediaKey::parse(&media_type, tmdb_id)?;
    let list = find_list(&state, id).await?;
    require_owner(&list, auth.user_id)?;

    if ListRepo::remove_item(&state.pool, id, key).await? {
        tracing::info!(user_id = %auth.user_id, list_id = id, media = %key, "List item removed");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::NotFoundByKey {
            entity: "List item",
            key: key.to_string(),
        }
        .into())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_list(state: &AppState, id: DbId) -> AppResult<UserList> {
    Ok(ListRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?)
}

fn require_owner(list: &UserList, user_id: UserId) -> Result<(), CoreError> {
    if list.user_id != user_id {
        return Err(CoreError::Forbidden(
            "Only the owner can modify this list".to_string(),
        ));
    }
    Ok(())
}

fn not_found(id: DbId) -> CoreError {
    CoreError::NotFound { entity: "List", id }
}

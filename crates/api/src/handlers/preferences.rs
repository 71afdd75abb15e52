//! Personal collections: watched, favorite, watchlist, currently watching.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use letssee_core::media::MediaKey;
use letssee_core::preferences::{PreferenceKind, PreferenceState};
use letssee_core::types::UserId;
use letssee_db::repositories::preference_repo::PreferenceChange;
use letssee_db::repositories::{EpisodeRepo, PreferenceRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppResult;
use crate::handlers::{ensure_profile, MediaRef};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct ToggleRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub media: MediaRef,
    /// `watched`, `favorite`, `watchlist` or `watching`.
    pub kind: String,
}

/// Optional metadata accompanying an explicit set.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct SetRequest {
    #[validate(length(max = 500))]
    pub title: Option<String>,
    #[validate(length(max = 500))]
    pub poster_path: Option<String>,
    #[validate(length(max = 32))]
    pub release_date: Option<String>,
}

/// Outcome of a preference mutation.
#[derive(Debug, Serialize)]
pub struct PreferenceResponse {
    pub media_type: &'static str,
    pub tmdb_id: i64,
    pub kind: PreferenceKind,
    /// Whether `kind` is on after the change.
    pub active: bool,
    pub state: PreferenceState,
    /// Collections the item was evicted from by this change.
    pub removed: Vec<PreferenceKind>,
}

impl PreferenceResponse {
    fn new(key: MediaKey, kind: PreferenceKind, change: &PreferenceChange) -> Self {
        Self {
            media_type: key.media_type.as_str(),
            tmdb_id: key.tmdb_id,
            kind,
            active: change.after.get(kind),
            state: change.after,
            removed: PreferenceKind::ALL
                .into_iter()
                .filter(|k| change.removed(*k))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// POST /api/v1/preferences/toggle
///
/// Flip one collection for a title. Turning a collection on evicts the
/// competing ones; turning it off touches nothing else.
pub async fn toggle(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ToggleRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let kind = PreferenceKind::parse(&input.kind)?;
    let key = input.media.key()?;
    let snapshot = input.media.snapshot()?;

    ensure_profile(&state, auth.user_id).await?;
    let change = PreferenceRepo::toggle(&state.pool, auth.user_id, key, kind, &snapshot).await?;
    after_change(&state, auth.user_id, key, &change).await;

    tracing::info!(
        user_id = %auth.user_id,
        media = %key,
        kind = %kind,
        active = change.after.get(kind),
        "Preference toggled",
    );

    Ok(Json(DataResponse {
        data: PreferenceResponse::new(key, kind, &change),
    }))
}

/// PUT /api/v1/preferences/{media_type}/{id}/{kind}
///
/// Idempotent "turn on".
pub async fn enable(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((media_type, id, kind)): Path<(String, i64, String)>,
    input: Option<Json<SetRequest>>,
) -> AppResult<impl IntoResponse> {
    let key = MediaKey::parse(&media_type, id)?;
    let kind = PreferenceKind::parse(&kind)?;
    let input = input.map(|Json(i)| i).unwrap_or_default();
    input.validate()?;
    let snapshot = MediaRef {
        media_type,
        tmdb_id: id,
        title: input.title,
        poster_path: input.poster_path,
        release_date: input.release_date,
    }
    .snapshot()?;

    ensure_profile(&state, auth.user_id).await?;
    let change = PreferenceRepo::enable(&state.pool, auth.user_id, key, kind, &snapshot).await?;
    after_change(&state, auth.user_id, key, &change).await;

    if !change.plan.is_noop() {
        tracing::info!(user_id = %auth.user_id, media = %key, kind = %kind, "Preference enabled");
    }

    Ok(Json(DataResponse {
        data: PreferenceResponse::new(key, kind, &change),
    }))
}

/// DELETE /api/v1/preferences/{media_type}/{id}/{kind}
///
/// Idempotent "turn off".
pub async fn disable(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((media_type, id, kind)): Path<(String, i64, String)>,
) -> AppResult<impl IntoResponse> {
    let key = MediaKey::parse(&media_type, id)?;
    let kind = PreferenceKind::parse(&kind)?;

    ensure_profile(&state, auth.user_id).await?;
    let change = PreferenceRepo::disable(&state.pool, auth.user_id, key, kind).await?;
    after_change(&state, auth.user_id, key, &change).await;

    if !change.plan.is_noop() {
        tracing::info!(user_id = %auth.user_id, media = %key, kind = %kind, "Preference disabled");
    }

    Ok(Json(DataResponse {
        data: PreferenceResponse::new(key, kind, &change),
    }))
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// GET /api/v1/preferences/{media_type}/{id}
pub async fn get_state(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((media_type, id)): Path<(String, i64)>,
) -> AppResult<impl IntoResponse> {
    let key = MediaKey::parse(&media_type, id)?;
    let prefs = PreferenceRepo::get_state(&state.pool, auth.user_id, key).await?;
    Ok(Json(DataResponse { data: prefs }))
}

/// GET /api/v1/library/{kind}?limit=&offset=
///
/// The caller's own collection, newest first, diary included.
pub async fn my_library(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let kind = PreferenceKind::parse(&kind)?;
    let (limit, offset) = params.clamped();
    let entries =
        PreferenceRepo::list_library(&state.pool, auth.user_id, kind, limit, offset).await?;
    Ok(Json(DataResponse { data: entries }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Side effects that follow a committed preference change.
///
/// Dropping a TV show from watched clears its episode progress. This is
/// best-effort: the preference change has already committed, so a failure
/// is logged and swallowed.
pub(crate) async fn after_change(
    state: &AppState,
    user_id: UserId,
    key: MediaKey,
    change: &PreferenceChange,
) {
    if !(key.is_tv() && change.removed(PreferenceKind::Watched)) {
        return;
    }
    match EpisodeRepo::clear_show(&state.pool, user_id, key.tmdb_id).await {
        Ok(cleared) => {
            tracing::debug!(%user_id, show_id = key.tmdb_id, cleared, "Cleared episode progress");
        }
        Err(e) => {
            tracing::warn!(
                %user_id,
                show_id = key.tmdb_id,
                error = %e,
                "Failed to clear episode progress after unwatching show",
            );
        }
    }
}

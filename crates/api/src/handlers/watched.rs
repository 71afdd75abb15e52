//! Rating, diary and review on a watched title.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use letssee_core::error::CoreError;
use letssee_core::media::MediaKey;
use letssee_core::preferences::PreferenceKind;
use letssee_core::types::Timestamp;
use letssee_core::watched::{
    rating_change, text_change, validate_watched_at, MAX_DIARY_LENGTH, MAX_REVIEW_LENGTH,
};
use letssee_db::models::watched::WatchedDetails;
use letssee_db::repositories::{PreferenceRepo, WatchedRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::preferences::after_change;
use crate::handlers::{ensure_profile, MediaRef};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Fields are optional; omitted fields keep their stored value.
///
/// `rating: 0` and blank text clear the field.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateWatchedRequest {
    pub rating: Option<f64>,
    pub diary_text: Option<String>,
    pub review_text: Option<String>,
    pub watched_at: Option<Timestamp>,
    pub title: Option<String>,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
}

/// PUT /api/v1/watched/{media_type}/{id}
///
/// Marks the title watched first when it is not (evicting watchlist and
/// currently-watching), then applies the detail changes.
pub async fn update_watched(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((media_type, id)): Path<(String, i64)>,
    Json(input): Json<UpdateWatchedRequest>,
) -> AppResult<impl IntoResponse> {
    let key = MediaKey::parse(&media_type, id)?;
    let details = WatchedDetails {
        rating: rating_change(input.rating)?.into_bind(),
        diary_text: text_change("diary_text", input.diary_text.as_deref(), MAX_DIARY_LENGTH)?
            .into_bind(),
        review_text: text_change(
            "review_text",
            input.review_text.as_deref(),
            MAX_REVIEW_LENGTH,
        )?
        .into_bind(),
        watched_at: input.watched_at,
    };
    if let Some(at) = input.watched_at {
        validate_watched_at(at, chrono::Utc::now())?;
    }
    let snapshot = MediaRef {
        media_type,
        tmdb_id: id,
        title: input.title,
        poster_path: input.poster_path,
        release_date: input.release_date,
    }
    .snapshot()?;

    ensure_profile(&state, auth.user_id).await?;
    let change = PreferenceRepo::enable(
        &state.pool,
        auth.user_id,
        key,
        PreferenceKind::Watched,
        &snapshot,
    )
    .await?;
    after_change(&state, auth.user_id, key, &change).await;

    let item = WatchedRepo::update_details(&state.pool, auth.user_id, key, &details)
        .await?
        .ok_or_else(|| {
            AppError::InternalError(format!("watched row for {key} vanished after enable"))
        })?;

    tracing::info!(
        user_id = %auth.user_id,
        media = %key,
        rating = ?item.rating,
        has_review = item.review_text.is_some(),
        "Watched details updated",
    );

    Ok(Json(DataResponse { data: item }))
}

/// GET /api/v1/watched/{media_type}/{id}
///
/// The caller's own record, diary included.
pub async fn get_watched(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((media_type, id)): Path<(String, i64)>,
) -> AppResult<impl IntoResponse> {
    let key = MediaKey::parse(&media_type, id)?;
    let item = WatchedRepo::find(&state.pool, auth.user_id, key)
        .await?
        .ok_or_else(|| CoreError::NotFoundByKey {
            entity: "Watched item",
            key: key.to_string(),
        })?;
    Ok(Json(DataResponse { data: item }))
}

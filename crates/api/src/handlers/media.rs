//! Title pages: details with credits and providers, seasons, public reviews.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use letssee_core::episodes::validate_season_number;
use letssee_core::media::MediaKey;
use letssee_db::models::watched::ReviewStats;
use letssee_db::repositories::WatchedRepo;
use letssee_tmdb::shape::{
    shape_credits, shape_details, shape_providers, CreditsView, DetailsView, ProvidersView,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MediaParams {
    /// ISO 3166-1 region for watch providers (default from config).
    pub region: Option<String>,
}

/// Everything the title page needs in one payload.
#[derive(Debug, Serialize)]
pub struct MediaPage {
    #[serde(flatten)]
    pub details: DetailsView,
    pub credits: CreditsView,
    pub watch_providers: ProvidersView,
    pub review_stats: ReviewStats,
}

/// GET /api/v1/media/{media_type}/{id}?region=
///
/// Details, credits and providers are fetched from TMDB concurrently along
/// with the review aggregate; any upstream failure fails the request.
pub async fn get_media(
    State(state): State<AppState>,
    Path((media_type, id)): Path<(String, i64)>,
    Query(params): Query<MediaParams>,
) -> AppResult<impl IntoResponse> {
    let key = MediaKey::parse(&media_type, id)?;
    let region = match params.region.as_deref().map(str::trim) {
        Some(r) if r.len() == 2 && r.chars().all(|c| c.is_ascii_alphabetic()) => r.to_string(),
        Some(r) if !r.is_empty() => {
            return Err(AppError::BadRequest(format!("Invalid region '{r}'")));
        }
        _ => state.tmdb.default_region().to_string(),
    };

    let (details, credits, providers, review_stats) = tokio::try_join!(
        async { state.tmdb.details(key).await.map_err(AppError::from) },
        async { state.tmdb.credits(key).await.map_err(AppError::from) },
        async { state.tmdb.watch_providers(key).await.map_err(AppError::from) },
        async {
            WatchedRepo::review_stats(&state.pool, key)
                .await
                .map_err(AppError::from)
        },
    )?;

    let creators = details.created_by.clone();
    let data = MediaPage {
        details: shape_details(details, key.media_type),
        credits: shape_credits(credits, creators),
        watch_providers: shape_providers(providers, &region),
        review_stats,
    };

    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/media/{media_type}/{id}/seasons/{season}
///
/// Only TV shows have seasons.
pub async fn get_season(
    State(state): State<AppState>,
    Path((media_type, id, season)): Path<(String, i64, i32)>,
) -> AppResult<impl IntoResponse> {
    let key = MediaKey::parse(&media_type, id)?;
    if !key.is_tv() {
        return Err(AppError::BadRequest("Only TV shows have seasons".into()));
    }
    validate_season_number(season)?;

    let data = state.tmdb.season(key.tmdb_id, season).await?;

    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/media/{media_type}/{id}/reviews?limit=&offset=
///
/// Public reviews from public profiles, newest first. Diary text is never
/// part of this projection.
pub async fn list_reviews(
    State(state): State<AppState>,
    Path((media_type, id)): Path<(String, i64)>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let key = MediaKey::parse(&media_type, id)?;
    let (limit, offset) = params.clamped();

    let reviews = WatchedRepo::list_public_reviews(&state.pool, key, limit, offset).await?;

    Ok(Json(DataResponse { data: reviews }))
}

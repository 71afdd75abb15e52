//! Per-episode progress for TV shows and bulk backfill from the catalog.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use letssee_core::episodes::{
    episodes_in_scope, seasons_to_fetch, summarize_progress, BackfillScope, EpisodeKey,
    SeasonProgress,
};
use letssee_core::media::{MediaKey, MediaType};
use letssee_db::models::episode::WatchedEpisode;
use letssee_db::repositories::EpisodeRepo;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::handlers::ensure_profile;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MarkEpisodeRequest {
    pub season_number: i32,
    pub episode_number: i32,
}

#[derive(Debug, Serialize)]
pub struct MarkEpisodeResponse {
    pub show_id: i64,
    pub season_number: i32,
    pub episode_number: i32,
    /// `false` when the episode was already marked.
    pub created: bool,
}

#[derive(Debug, Serialize)]
pub struct ShowProgress {
    pub show_id: i64,
    pub total_watched: usize,
    pub seasons: Vec<SeasonProgress>,
    pub episodes: Vec<WatchedEpisode>,
}

#[derive(Debug, Serialize)]
pub struct BackfillResponse {
    pub show_id: i64,
    /// Episodes inside the scope according to the catalog.
    pub requested: usize,
    /// Rows actually inserted; already-watched episodes are skipped.
    pub inserted: u64,
    pub seasons: Vec<i32>,
}

/// GET /api/v1/shows/{show_id}/episodes
pub async fn list_episodes(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(show_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let show = MediaKey::new(MediaType::Tv, show_id)?;
    let episodes = EpisodeRepo::list_for_show(&state.pool, auth.user_id, show.tmdb_id).await?;

    let keys: Vec<EpisodeKey> = episodes
        .iter()
        .map(|e| EpisodeKey {
            season_number: e.season_number,
            episode_number: e.episode_number,
        })
        .collect();

    Ok(Json(DataResponse {
        data: ShowProgress {
            show_id: show.tmdb_id,
            total_watched: keys.len(),
            seasons: summarize_progress(&keys),
            episodes,
        },
    }))
}

/// POST /api/v1/shows/{show_id}/episodes
///
/// Marking an already-watched episode succeeds without creating a row.
pub async fn mark_episode(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(show_id): Path<i64>,
    Json(input): Json<MarkEpisodeRequest>,
) -> AppResult<impl IntoResponse> {
    let show = MediaKey::new(MediaType::Tv, show_id)?;
    let episode = EpisodeKey::new(input.season_number, input.episode_number)?;

    ensure_profile(&state, auth.user_id).await?;
    let created = EpisodeRepo::mark(&state.pool, auth.user_id, show.tmdb_id, episode).await?;

    if created {
        tracing::info!(
            user_id = %auth.user_id,
            show_id,
            season = episode.season_number,
            episode = episode.episode_number,
            "Episode marked watched",
        );
    }

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(DataResponse {
            data: MarkEpisodeResponse {
                show_id,
                season_number: episode.season_number,
                episode_number: episode.episode_number,
                created,
            },
        }),
    ))
}

/// DELETE /api/v1/shows/{show_id}/episodes/{season}/{episode}
pub async fn unmark_episode(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((show_id, season, number)): Path<(i64, i32, i32)>,
) -> AppResult<StatusCode> {
    let show = MediaKey::new(MediaType::Tv, show_id)?;
    let episode = EpisodeKey::new(season, number)?;

    let removed = EpisodeRepo::unmark(&state.pool, auth.user_id, show.tmdb_id, episode).await?;
    if removed {
        tracing::info!(user_id = %auth.user_id, show_id, season, episode = number, "Episode unmarked");
    }

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/shows/{show_id}/backfill
///
/// Body is one of `{"scope":"all"}`, `{"scope":"season","season":N}` or
/// `{"scope":"through","season":N,"episode":M}`. Seasons are fetched one at
/// a time; the collected keys are inserted in fixed-size chunks.
pub async fn backfill(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(show_id): Path<i64>,
    Json(scope): Json<BackfillScope>,
) -> AppResult<impl IntoResponse> {
    let show = MediaKey::new(MediaType::Tv, show_id)?;
    scope.validate()?;

    let details = state.tmdb.details(show).await?;
    let seasons = seasons_to_fetch(&scope, &details.season_numbers())?;

    let mut keys = Vec::new();
    for season_number in &seasons {
        let season = state.tmdb.season(show.tmdb_id, *season_number).await?;
        keys.extend(episodes_in_scope(
            &scope,
            *season_number,
            &season.episode_numbers(),
        ));
    }

    ensure_profile(&state, auth.user_id).await?;
    let inserted = EpisodeRepo::bulk_mark(&state.pool, auth.user_id, show.tmdb_id, &keys).await?;

    tracing::info!(
        user_id = %auth.user_id,
        show_id,
        scope = ?scope,
        requested = keys.len(),
        inserted,
        "Episode backfill complete",
    );

    Ok(Json(DataResponse {
        data: BackfillResponse {
            show_id,
            requested: keys.len(),
            inserted,
            seasons,
        },
    }))
}

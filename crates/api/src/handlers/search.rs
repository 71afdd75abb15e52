//! Catalog listings: search, discover and trending.
//!
//! Listings are returned as the bare `{ results, total_pages, total_results }`
//! page rather than inside the `{ data }` envelope.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use letssee_core::media::MediaType;
use letssee_core::search::{
    clamp_page, prepare_query, CatalogScope, DiscoverFilters, SearchQuery, TrendingWindow,
};
use letssee_tmdb::shape::shape_page;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub page: Option<u32>,
    #[serde(rename = "type")]
    pub scope: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DiscoverParams {
    pub page: Option<u32>,
    pub genre: Option<String>,
    pub sort_by: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TrendingParams {
    pub page: Option<u32>,
    pub window: Option<String>,
}

/// GET /api/v1/search?q=&page=&type=
///
/// Queries shorter than two characters are rejected before any upstream call.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<impl IntoResponse> {
    let query = match prepare_query(params.q.as_deref())? {
        SearchQuery::TooShort => return Err(AppError::QueryTooShort),
        SearchQuery::Ready(query) => query,
    };
    let scope: CatalogScope = match params.scope.as_deref() {
        Some(raw) => raw.parse()?,
        None => CatalogScope::default(),
    };
    let page = clamp_page(params.page);

    let raw = state.tmdb.search(scope, &query, page).await?;
    let data = shape_page(raw, scope);

    tracing::debug!(%query, page, results = data.results.len(), "Catalog search");

    Ok(Json(data))
}

/// GET /api/v1/discover/{media_type}?page=&genre=&sort_by=
pub async fn discover(
    State(state): State<AppState>,
    Path(media_type): Path<String>,
    Query(params): Query<DiscoverParams>,
) -> AppResult<impl IntoResponse> {
    let media_type = MediaType::parse(&media_type)?;
    let filters = DiscoverFilters::new(params.genre.as_deref(), params.sort_by.as_deref())?;
    let page = clamp_page(params.page);

    let raw = state.tmdb.discover(media_type, page, &filters).await?;

    Ok(Json(shape_page(raw, media_type.into())))
}

/// GET /api/v1/trending/{media_type}?window=day|week
///
/// `media_type` may also be `all` (or `multi`) for mixed results.
pub async fn trending(
    State(state): State<AppState>,
    Path(scope): Path<String>,
    Query(params): Query<TrendingParams>,
) -> AppResult<impl IntoResponse> {
    let scope: CatalogScope = scope.parse()?;
    let window: TrendingWindow = match params.window.as_deref() {
        Some(raw) => raw.parse()?,
        None => TrendingWindow::default(),
    };
    let page = clamp_page(params.page);

    let raw = state.tmdb.trending(scope, window, page).await?;

    Ok(Json(shape_page(raw, scope)))
}

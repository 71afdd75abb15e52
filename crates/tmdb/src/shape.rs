//! Shaping TMDB payloads into API responses.
//!
//! Listings become `{ results, total_pages, total_results }` with TV fields
//! folded into the movie names (`name` -> `title`, `first_air_date` ->
//! `release_date`). Person rows are dropped.

use letssee_core::media::MediaType;
use letssee_core::search::CatalogScope;
use serde::Serialize;

use crate::models::{
    CastMember, Creator, Credits, CrewMember, Details, Genre, ListingResult, Page,
    RegionProviders, SeasonSummary, WatchProviders,
};

/// Top-billed cast entries kept in details responses.
pub const MAX_CAST: usize = 20;

/// One movie or show in a listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogItem {
    pub id: i64,
    pub media_type: MediaType,
    pub title: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    pub overview: Option<String>,
    pub vote_average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogPage {
    pub results: Vec<CatalogItem>,
    pub total_pages: u32,
    pub total_results: u32,
}

/// Shape a listing. `scope` supplies the media type for single-type
/// endpoints, which omit it per row.
pub fn shape_page(page: Page<ListingResult>, scope: CatalogScope) -> CatalogPage {
    let results = page
        .results
        .into_iter()
        .filter_map(|row| shape_item(row, scope))
        .collect();
    CatalogPage {
        results,
        total_pages: page.total_pages,
        total_results: page.total_results,
    }
}

fn shape_item(row: ListingResult, scope: CatalogScope) -> Option<CatalogItem> {
    let media_type = match scope.media_type() {
        Some(media_type) => media_type,
        // `person` and anything unknown is dropped.
        None => row.media_type.as_deref()?.parse().ok()?,
    };
    Some(CatalogItem {
        id: row.id,
        media_type,
        title: non_empty(row.title).or_else(|| non_empty(row.name)),
        poster_path: row.poster_path,
        backdrop_path: row.backdrop_path,
        release_date: non_empty(row.release_date).or_else(|| non_empty(row.first_air_date)),
        overview: non_empty(row.overview),
        vote_average: row.vote_average,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Normalized movie or show details.
#[derive(Debug, Clone, Serialize)]
pub struct DetailsView {
    pub id: i64,
    pub media_type: MediaType,
    pub title: Option<String>,
    pub overview: Option<String>,
    pub tagline: Option<String>,
    pub status: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    /// Movie runtime, or the typical episode runtime for shows.
    pub runtime: Option<i32>,
    pub genres: Vec<Genre>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_seasons: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_episodes: Option<i32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub seasons: Vec<SeasonSummary>,
}

pub fn shape_details(details: Details, media_type: MediaType) -> DetailsView {
    let runtime = details
        .runtime
        .or_else(|| details.episode_run_time.first().copied());
    DetailsView {
        id: details.id,
        media_type,
        title: non_empty(details.title).or_else(|| non_empty(details.name)),
        overview: non_empty(details.overview),
        tagline: non_empty(details.tagline),
        status: details.status,
        poster_path: details.poster_path,
        backdrop_path: details.backdrop_path,
        release_date: non_empty(details.release_date)
            .or_else(|| non_empty(details.first_air_date)),
        runtime,
        genres: details.genres,
        vote_average: details.vote_average,
        vote_count: details.vote_count,
        number_of_seasons: details.number_of_seasons,
        number_of_episodes: details.number_of_episodes,
        seasons: details.seasons,
    }
}

/// Cast capped at [`MAX_CAST`], plus the people behind the title.
#[derive(Debug, Clone, Serialize)]
pub struct CreditsView {
    pub cast: Vec<CastMember>,
    pub directors: Vec<CrewMember>,
    pub creators: Vec<Creator>,
}

/// `creators` comes from TV details, since credits do not list them.
pub fn shape_credits(credits: Credits, creators: Vec<Creator>) -> CreditsView {
    let mut cast = credits.cast;
    cast.sort_by_key(|c| c.order);
    cast.truncate(MAX_CAST);

    let directors = credits
        .crew
        .into_iter()
        .filter(|c| c.job.as_deref() == Some("Director"))
        .collect();

    CreditsView {
        cast,
        directors,
        creators,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProvidersView {
    pub region: String,
    /// `None` when the title is not available in the region.
    pub providers: Option<RegionProviders>,
}

pub fn shape_providers(mut providers: WatchProviders, region: &str) -> ProvidersView {
    let region = region.to_ascii_uppercase();
    ProvidersView {
        providers: providers.results.remove(&region),
        region,
    }
}

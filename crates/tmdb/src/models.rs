//! TMDB v3 response payloads.
//!
//! Only the fields the API uses are modelled; unknown fields are ignored.
//! Movie and TV payloads share one struct, with the fields of the other
//! type left empty.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A paginated listing (search, discover, trending).
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

/// One row of a listing. Movies carry `title`/`release_date`, TV shows
/// carry `name`/`first_air_date`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingResult {
    pub id: i64,
    /// Present on multi-search and trending/all rows only.
    pub media_type: Option<String>,
    pub title: Option<String>,
    pub name: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    pub overview: Option<String>,
    pub vote_average: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Creator {
    pub id: i64,
    pub name: String,
    pub profile_path: Option<String>,
}

/// Season entry inside TV details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonSummary {
    pub id: i64,
    pub season_number: i32,
    pub name: Option<String>,
    #[serde(default)]
    pub episode_count: i32,
    pub air_date: Option<String>,
    pub poster_path: Option<String>,
}

/// `/movie/{id}` or `/tv/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Details {
    pub id: i64,
    pub title: Option<String>,
    pub name: Option<String>,
    pub overview: Option<String>,
    pub tagline: Option<String>,
    pub status: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    pub runtime: Option<i32>,
    #[serde(default)]
    pub episode_run_time: Vec<i32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
    pub number_of_seasons: Option<i32>,
    pub number_of_episodes: Option<i32>,
    #[serde(default)]
    pub seasons: Vec<SeasonSummary>,
    #[serde(default)]
    pub created_by: Vec<Creator>,
}

impl Details {
    /// Season numbers the show lists, in TMDB order.
    pub fn season_numbers(&self) -> Vec<i32> {
        self.seasons.iter().map(|s| s.season_number).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastMember {
    pub id: i64,
    pub name: String,
    pub character: Option<String>,
    pub profile_path: Option<String>,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewMember {
    pub id: i64,
    pub name: String,
    pub job: Option<String>,
    pub department: Option<String>,
    pub profile_path: Option<String>,
}

/// `/movie/{id}/credits` or `/tv/{id}/credits`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    pub id: i64,
    pub season_number: i32,
    pub episode_number: i32,
    pub name: Option<String>,
    pub overview: Option<String>,
    pub air_date: Option<String>,
    pub still_path: Option<String>,
    pub runtime: Option<i32>,
    pub vote_average: Option<f64>,
}

/// `/tv/{id}/season/{n}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Season {
    pub id: i64,
    pub season_number: i32,
    pub name: Option<String>,
    pub overview: Option<String>,
    pub air_date: Option<String>,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

impl Season {
    pub fn episode_numbers(&self) -> Vec<i32> {
        self.episodes.iter().map(|e| e.episode_number).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    pub provider_id: i64,
    pub provider_name: String,
    pub logo_path: Option<String>,
    #[serde(default)]
    pub display_priority: i32,
}

/// Providers for one region.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegionProviders {
    pub link: Option<String>,
    #[serde(default)]
    pub flatrate: Vec<Provider>,
    #[serde(default)]
    pub rent: Vec<Provider>,
    #[serde(default)]
    pub buy: Vec<Provider>,
    #[serde(default)]
    pub free: Vec<Provider>,
    #[serde(default)]
    pub ads: Vec<Provider>,
}

/// `/{type}/{id}/watch/providers`, keyed by ISO 3166-1 region code.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WatchProviders {
    #[serde(default)]
    pub results: HashMap<String, RegionProviders>,
}

/// Error body TMDB returns alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub status_code: Option<i64>,
    pub status_message: Option<String>,
}

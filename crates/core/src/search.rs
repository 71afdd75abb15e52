//! Catalog search and listing parameters.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::media::MediaType;

/// Queries shorter than this (after trimming) are rejected without an
/// upstream call.
pub const MIN_QUERY_CHARS: usize = 2;

/// Maximum query length forwarded upstream.
pub const MAX_QUERY_CHARS: usize = 200;

/// TMDB rejects pages above 500.
pub const MAX_PAGE: u32 = 500;

/// Default page size for database-backed listings.
pub const DEFAULT_LIMIT: i64 = 20;

/// Maximum page size for database-backed listings.
pub const MAX_LIMIT: i64 = 100;

/// Outcome of checking a search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    /// Too short to search; answer without calling upstream.
    TooShort,
    Ready(String),
}

/// Trim and check a raw query string.
pub fn prepare_query(raw: Option<&str>) -> Result<SearchQuery, CoreError> {
    let query = raw.unwrap_or_default().trim();
    let chars = query.chars().count();
    if chars < MIN_QUERY_CHARS {
        return Ok(SearchQuery::TooShort);
    }
    if chars > MAX_QUERY_CHARS {
        return Err(CoreError::Validation(format!(
            "Query exceeds maximum length of {MAX_QUERY_CHARS} characters"
        )));
    }
    Ok(SearchQuery::Ready(query.to_string()))
}

/// Clamp a requested page into TMDB's accepted range.
pub fn clamp_page(page: Option<u32>) -> u32 {
    page.unwrap_or(1).clamp(1, MAX_PAGE)
}

/// Clamp a listing limit.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// Clamp a listing offset.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// TMDB sort keys look like `popularity.desc` or `primary_release_date.asc`.
static SORT_BY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z_]+\.(asc|desc)$").expect("valid regex"));

/// Comma (AND) or pipe (OR) separated numeric genre ids.
static GENRES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+([,|]\d+)*$").expect("valid regex"));

pub const DEFAULT_SORT_BY: &str = "popularity.desc";

/// Which part of the catalog a listing covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogScope {
    /// Movies and TV together (`multi` search, `all` trending).
    #[default]
    Multi,
    Movie,
    Tv,
}

impl CatalogScope {
    /// The media type every result has, when the scope fixes one.
    pub fn media_type(self) -> Option<MediaType> {
        match self {
            CatalogScope::Multi => None,
            CatalogScope::Movie => Some(MediaType::Movie),
            CatalogScope::Tv => Some(MediaType::Tv),
        }
    }
}

impl From<MediaType> for CatalogScope {
    fn from(media_type: MediaType) -> Self {
        match media_type {
            MediaType::Movie => CatalogScope::Movie,
            MediaType::Tv => CatalogScope::Tv,
        }
    }
}

impl FromStr for CatalogScope {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "multi" | "all" => Ok(CatalogScope::Multi),
            "movie" => Ok(CatalogScope::Movie),
            "tv" => Ok(CatalogScope::Tv),
            other => Err(CoreError::Validation(format!(
                "Invalid type '{other}'. Must be one of: multi, movie, tv"
            ))),
        }
    }
}

/// Trending time window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendingWindow {
    Day,
    #[default]
    Week,
}

impl TrendingWindow {
    pub fn as_str(self) -> &'static str {
        match self {
            TrendingWindow::Day => "day",
            TrendingWindow::Week => "week",
        }
    }
}

impl fmt::Display for TrendingWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrendingWindow {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(TrendingWindow::Day),
            "week" => Ok(TrendingWindow::Week),
            other => Err(CoreError::Validation(format!(
                "Invalid window '{other}'. Must be day or week"
            ))),
        }
    }
}

/// Validated discover filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoverFilters {
    pub genres: Option<String>,
    pub sort_by: String,
}

impl DiscoverFilters {
    pub fn new(genres: Option<&str>, sort_by: Option<&str>) -> Result<Self, CoreError> {
        let genres = genres.map(str::trim).filter(|g| !g.is_empty());
        if let Some(g) = genres {
            if !GENRES_RE.is_match(g) {
                return Err(CoreError::Validation(format!(
                    "Invalid genre filter '{g}'"
                )));
            }
        }
        let sort_by = sort_by
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SORT_BY);
        if !SORT_BY_RE.is_match(sort_by) {
            return Err(CoreError::Validation(format!("Invalid sort_by '{sort_by}'")));
        }
        Ok(Self {
            genres: genres.map(str::to_string),
            sort_by: sort_by.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_character_is_too_short() {
        assert_eq!(prepare_query(Some("a")).unwrap(), SearchQuery::TooShort);
        assert_eq!(prepare_query(Some("  b  ")).unwrap(), SearchQuery::TooShort);
        assert_eq!(prepare_query(None).unwrap(), SearchQuery::TooShort);
    }

    #[test]
    fn two_characters_are_searchable() {
        assert_eq!(
            prepare_query(Some(" up ")).unwrap(),
            SearchQuery::Ready("up".to_string())
        );
    }

    #[test]
    fn overlong_query_is_rejected() {
        assert!(prepare_query(Some(&"q".repeat(MAX_QUERY_CHARS + 1))).is_err());
    }

    #[test]
    fn paging_is_clamped() {
        assert_eq!(clamp_page(None), 1);
        assert_eq!(clamp_page(Some(0)), 1);
        assert_eq!(clamp_page(Some(9_999)), MAX_PAGE);
        assert_eq!(clamp_limit(Some(1_000)), MAX_LIMIT);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_offset(Some(-5)), 0);
    }

    #[test]
    fn scope_parsing() {
        assert_eq!("multi".parse::<CatalogScope>().unwrap(), CatalogScope::Multi);
        assert_eq!("all".parse::<CatalogScope>().unwrap(), CatalogScope::Multi);
        assert_eq!(
            "tv".parse::<CatalogScope>().unwrap().media_type(),
            Some(MediaType::Tv)
        );
        assert!("person".parse::<CatalogScope>().is_err());
    }

    #[test]
    fn trending_window_defaults_to_week() {
        assert_eq!(TrendingWindow::default(), TrendingWindow::Week);
        assert!("month".parse::<TrendingWindow>().is_err());
    }

    #[test]
    fn discover_filters() {
        let filters = DiscoverFilters::new(Some("28,12"), None).unwrap();
        assert_eq!(filters.genres.as_deref(), Some("28,12"));
        assert_eq!(filters.sort_by, DEFAULT_SORT_BY);

        assert!(DiscoverFilters::new(Some("action"), None).is_err());
        assert!(DiscoverFilters::new(None, Some("popularity")).is_err());
        assert!(DiscoverFilters::new(None, Some("vote_average.desc")).is_ok());
        assert_eq!(DiscoverFilters::new(Some("  "), None).unwrap().genres, None);
    }
}

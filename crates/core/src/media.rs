//! Media identifiers shared by every layer.
//!
//! A title is identified by its TMDB id together with its media type, since
//! TMDB movie and TV ids live in separate namespaces.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum length for a cached title.
pub const MAX_TITLE_LENGTH: usize = 500;

/// Kind of title in the TMDB catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    pub const ALL: [MediaType; 2] = [MediaType::Movie, MediaType::Tv];

    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }

    /// Parse a path or query segment, mapping failures to a validation error.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        value.parse()
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(MediaType::Movie),
            "tv" => Ok(MediaType::Tv),
            other => Err(CoreError::Validation(format!(
                "Invalid media_type '{other}'. Must be one of: movie, tv"
            ))),
        }
    }
}

impl TryFrom<String> for MediaType {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// `(media_type, tmdb_id)` pair identifying a title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaKey {
    pub media_type: MediaType,
    pub tmdb_id: i64,
}

impl MediaKey {
    /// Build a key, rejecting non-positive TMDB ids.
    pub fn new(media_type: MediaType, tmdb_id: i64) -> Result<Self, CoreError> {
        if tmdb_id <= 0 {
            return Err(CoreError::Validation(format!(
                "tmdb_id must be a positive integer, got {tmdb_id}"
            )));
        }
        Ok(Self {
            media_type,
            tmdb_id,
        })
    }

    /// Build a key from a raw path segment and id.
    pub fn parse(media_type: &str, tmdb_id: i64) -> Result<Self, CoreError> {
        Self::new(MediaType::parse(media_type)?, tmdb_id)
    }

    pub fn is_tv(&self) -> bool {
        self.media_type == MediaType::Tv
    }
}

impl fmt::Display for MediaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.media_type, self.tmdb_id)
    }
}

/// Optional display metadata supplied alongside a mutation so libraries and
/// message cards render without a catalog round-trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaSnapshot {
    pub title: Option<String>,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
}

impl MediaSnapshot {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.poster_path.is_none() && self.release_date.is_none()
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(title) = &self.title {
            if title.chars().count() > MAX_TITLE_LENGTH {
                return Err(CoreError::Validation(format!(
                    "title exceeds maximum length of {MAX_TITLE_LENGTH} characters"
                )));
            }
        }
        if let Some(poster) = &self.poster_path {
            if !poster.is_empty() && !poster.starts_with('/') {
                return Err(CoreError::Validation(
                    "poster_path must be a TMDB image path starting with '/'".to_string(),
                ));
            }
        }
        Ok(())
    }
}

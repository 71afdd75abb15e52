//! Request handlers, one submodule per resource.
//!
//! Handlers validate input with the rules in `letssee_core`, delegate to the
//! repositories in `letssee_db` or the catalog client in `letssee_tmdb`, and
//! map failures through [`AppError`](crate::error::AppError).

pub mod episodes;
pub mod follows;
pub mod lists;
pub mod media;
pub mod messages;
pub mod preferences;
pub mod profiles;
pub mod search;
pub mod watched;

use letssee_core::media::{MediaKey, MediaSnapshot};
use letssee_core::profiles::default_username;
use letssee_core::types::UserId;
use letssee_db::repositories::ProfileRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::AppResult;
use crate::state::AppState;

/// Create the caller's profile and counter rows on their first write.
///
/// Every user-owned table references `profiles`, and the auth provider
/// knows nothing about them, so mutations call this before writing.
pub(crate) async fn ensure_profile(state: &AppState, user_id: UserId) -> AppResult<()> {
    if ProfileRepo::ensure(&state.pool, user_id, &default_username(user_id)).await? {
        tracing::info!(%user_id, "Profile created on first write");
    }
    Ok(())
}

/// A title reference in a request body, with optional display metadata
/// cached into `media_items`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MediaRef {
    pub media_type: String,
    pub tmdb_id: i64,
    #[validate(length(max = 500))]
    pub title: Option<String>,
    #[validate(length(max = 500))]
    pub poster_path: Option<String>,
    #[validate(length(max = 32))]
    pub release_date: Option<String>,
}

impl MediaRef {
    pub fn key(&self) -> AppResult<MediaKey> {
        Ok(MediaKey::parse(&self.media_type, self.tmdb_id)?)
    }

    pub fn snapshot(&self) -> AppResult<MediaSnapshot> {
        let snapshot = MediaSnapshot {
            title: non_blank(&self.title),
            poster_path: non_blank(&self.poster_path),
            release_date: non_blank(&self.release_date),
        };
        snapshot.validate()?;
        Ok(snapshot)
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Distinguish "field absent" from "field explicitly null" in a JSON patch.
///
/// Use with `#[serde(default, deserialize_with = "double_option")]` on an
/// `Option<Option<T>>` field.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        bio: Option<Option<String>>,
    }

    #[test]
    fn double_option_distinguishes_null_from_absent() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        let null: Patch = serde_json::from_str(r#"{"bio": null}"#).unwrap();
        let set: Patch = serde_json::from_str(r#"{"bio": "hi"}"#).unwrap();

        assert_eq!(absent.bio, None);
        assert_eq!(null.bio, Some(None));
        assert_eq!(set.bio, Some(Some("hi".to_string())));
    }

    #[test]
    fn media_ref_trims_blank_metadata() {
        let media: MediaRef = serde_json::from_str(
            r#"{"media_type": "tv", "tmdb_id": 1399, "title": "  ", "poster_path": "/got.jpg"}"#,
        )
        .unwrap();

        let snapshot = media.snapshot().unwrap();
        assert_eq!(snapshot.title, None);
        assert_eq!(snapshot.poster_path.as_deref(), Some("/got.jpg"));
        assert!(media.key().unwrap().is_tv());
    }

    #[test]
    fn media_ref_rejects_bad_type() {
        let media: MediaRef =
            serde_json::from_str(r#"{"media_type": "person", "tmdb_id": 5}"#).unwrap();
        assert!(media.key().is_err());
    }
}

//! Rating, diary and review rules for watched titles.

use crate::error::CoreError;
use crate::types::Timestamp;

/// Lowest non-zero rating (half a star).
pub const MIN_RATING: f64 = 0.5;

/// Highest rating (five stars).
pub const MAX_RATING: f64 = 5.0;

/// Maximum length of the private diary text.
pub const MAX_DIARY_LENGTH: usize = 10_000;

/// Maximum length of the public review text.
pub const MAX_REVIEW_LENGTH: usize = 5_000;

/// Outcome of a partial update for one optional column.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldChange<T> {
    Keep,
    Clear,
    Set(T),
}

impl<T> FieldChange<T> {
    /// `(should_write, value)` pair for binding into a `CASE WHEN` update.
    pub fn into_bind(self) -> (bool, Option<T>) {
        match self {
            FieldChange::Keep => (false, None),
            FieldChange::Clear => (true, None),
            FieldChange::Set(value) => (true, Some(value)),
        }
    }
}

/// Validate a rating. `0` clears it; otherwise it must be a half-star step
/// between 0.5 and 5.0.
pub fn rating_change(input: Option<f64>) -> Result<FieldChange<f64>, CoreError> {
    let Some(rating) = input else {
        return Ok(FieldChange::Keep);
    };
    if rating == 0.0 {
        return Ok(FieldChange::Clear);
    }
    if !rating.is_finite() || !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(CoreError::Validation(format!(
            "rating must be between {MIN_RATING} and {MAX_RATING}, got {rating}"
        )));
    }
    if (rating * 2.0).fract() != 0.0 {
        return Err(CoreError::Validation(format!(
            "rating must be a multiple of 0.5, got {rating}"
        )));
    }
    Ok(FieldChange::Set(rating))
}

/// Validate a free-text field. Whitespace-only input clears it.
pub fn text_change(
    field: &str,
    input: Option<&str>,
    max_length: usize,
) -> Result<FieldChange<String>, CoreError> {
    let Some(text) = input else {
        return Ok(FieldChange::Keep);
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(FieldChange::Clear);
    }
    if trimmed.chars().count() > max_length {
        return Err(CoreError::Validation(format!(
            "{field} exceeds maximum length of {max_length} characters"
        )));
    }
    Ok(FieldChange::Set(trimmed.to_string()))
}

/// A watch date may not lie in the future.
pub fn validate_watched_at(watched_at: Timestamp, now: Timestamp) -> Result<(), CoreError> {
    if watched_at > now {
        return Err(CoreError::Validation(
            "watched_at cannot be in the future".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    use super::*;

    #[test]
    fn rating_half_steps() {
        assert_eq!(rating_change(Some(3.5)).unwrap(), FieldChange::Set(3.5));
        assert_eq!(rating_change(Some(5.0)).unwrap(), FieldChange::Set(5.0));
        assert_matches!(rating_change(Some(3.3)), Err(CoreError::Validation(_)));
        assert_matches!(rating_change(Some(5.5)), Err(CoreError::Validation(_)));
        assert_matches!(rating_change(Some(f64::NAN)), Err(CoreError::Validation(_)));
    }

    #[test]
    fn rating_zero_clears_and_none_keeps() {
        assert_eq!(rating_change(Some(0.0)).unwrap(), FieldChange::Clear);
        assert_eq!(rating_change(None).unwrap(), FieldChange::Keep);
    }

    #[test]
    fn blank_text_clears() {
        let change = text_change("review_text", Some("   "), MAX_REVIEW_LENGTH).unwrap();
        assert_eq!(change, FieldChange::Clear);
        assert_eq!(change.into_bind(), (true, None));
    }

    #[test]
    fn text_is_trimmed_and_bounded() {
        let change = text_change("diary_text", Some("  loved it \n"), MAX_DIARY_LENGTH).unwrap();
        assert_eq!(change, FieldChange::Set("loved it".to_string()));

        let long = "x".repeat(MAX_REVIEW_LENGTH + 1);
        let err = text_change("review_text", Some(&long), MAX_REVIEW_LENGTH).unwrap_err();
        assert!(err.to_string().contains("review_text"));
    }

    #[test]
    fn future_watch_date_rejected() {
        let now = Utc::now();
        assert!(validate_watched_at(now - Duration::days(1), now).is_ok());
        assert_matches!(
            validate_watched_at(now + Duration::hours(1), now),
            Err(CoreError::Validation(_))
        );
    }
}

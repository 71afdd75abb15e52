//! Profile rules: usernames, visibility and who may see what.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::UserId;

/// Lowercase letters, digits and underscores, 3 to 30 characters.
const USERNAME_PATTERN: &str = r"^[a-z0-9_]{3,30}$";

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(USERNAME_PATTERN).expect("valid regex"));

pub const MAX_BIO_LENGTH: usize = 500;
pub const MAX_DISPLAY_NAME_LENGTH: usize = 50;
pub const MAX_AVATAR_URL_LENGTH: usize = 2_048;

/// Who can see a profile's libraries, lists and activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }

    pub fn is_private(self) -> bool {
        self == Visibility::Private
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Visibility::Public),
            "private" => Ok(Visibility::Private),
            other => Err(CoreError::Validation(format!(
                "Invalid visibility '{other}'. Must be one of: public, private"
            ))),
        }
    }
}

impl TryFrom<String> for Visibility {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// How the viewer relates to the profile being viewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    #[serde(rename = "self")]
    Own,
    Following,
    Requested,
    None,
}

/// Whether `relationship` grants access to a profile with `visibility`.
pub fn can_view(visibility: Visibility, relationship: Relationship) -> bool {
    match relationship {
        Relationship::Own | Relationship::Following => true,
        Relationship::Requested | Relationship::None => visibility == Visibility::Public,
    }
}

/// Lowercase and validate a username.
pub fn normalize_username(raw: &str) -> Result<String, CoreError> {
    let username = raw.trim().to_lowercase();
    if !USERNAME_RE.is_match(&username) {
        return Err(CoreError::Validation(format!(
            "Invalid username '{raw}'. Use 3-30 lowercase letters, digits or underscores"
        )));
    }
    Ok(username)
}

/// Placeholder username for a profile created implicitly on first write.
///
/// The first 25 hex digits of the user id keep it unique in practice and
/// inside the 30-character limit.
pub fn default_username(user_id: UserId) -> String {
    let hex = user_id.simple().to_string();
    format!("user_{}", &hex[..25])
}

pub fn validate_bio(bio: &str) -> Result<(), CoreError> {
    if bio.chars().count() > MAX_BIO_LENGTH {
        return Err(CoreError::Validation(format!(
            "bio exceeds maximum length of {MAX_BIO_LENGTH} characters"
        )));
    }
    Ok(())
}

pub fn validate_display_name(name: &str) -> Result<(), CoreError> {
    if name.chars().count() > MAX_DISPLAY_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "display_name exceeds maximum length of {MAX_DISPLAY_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

pub fn validate_avatar_url(url: &str) -> Result<(), CoreError> {
    if url.len() > MAX_AVATAR_URL_LENGTH {
        return Err(CoreError::Validation("avatar_url is too long".to_string()));
    }
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(CoreError::Validation(
            "avatar_url must be an http(s) URL".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn usernames_are_lowercased() {
        assert_eq!(normalize_username("  Film_Fan42 ").unwrap(), "film_fan42");
    }

    #[test]
    fn usernames_reject_bad_characters_and_lengths() {
        assert_matches!(normalize_username("ab"), Err(CoreError::Validation(_)));
        assert_matches!(normalize_username("has space"), Err(CoreError::Validation(_)));
        assert_matches!(normalize_username("dash-name"), Err(CoreError::Validation(_)));
        assert_matches!(
            normalize_username(&"a".repeat(31)),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn default_username_is_valid() {
        let name = default_username(uuid::Uuid::new_v4());
        assert_eq!(normalize_username(&name).unwrap(), name);
    }

    #[test]
    fn private_profiles_need_a_connection() {
        assert!(can_view(Visibility::Public, Relationship::None));
        assert!(!can_view(Visibility::Private, Relationship::None));
        assert!(!can_view(Visibility::Private, Relationship::Requested));
        assert!(can_view(Visibility::Private, Relationship::Following));
        assert!(can_view(Visibility::Private, Relationship::Own));
    }

    #[test]
    fn avatar_must_be_http() {
        assert!(validate_avatar_url("https://cdn.example.com/a.png").is_ok());
        assert_matches!(
            validate_avatar_url("javascript:alert(1)"),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn bio_length_limit() {
        assert!(validate_bio("Horror every October.").is_ok());
        assert_matches!(
            validate_bio(&"b".repeat(MAX_BIO_LENGTH + 1)),
            Err(CoreError::Validation(_))
        );
    }
}

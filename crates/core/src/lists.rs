//! Custom user list rules.

use crate::error::CoreError;

pub const MAX_LIST_NAME_LENGTH: usize = 100;
pub const MAX_LIST_DESCRIPTION_LENGTH: usize = 1_000;

/// Maximum number of titles in a single list.
pub const MAX_LIST_ITEMS: i64 = 1_000;

/// Trim and validate a list name.
pub fn normalize_list_name(raw: &str) -> Result<String, CoreError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(CoreError::Validation("List name must not be empty".to_string()));
    }
    if name.chars().count() > MAX_LIST_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "List name exceeds maximum length of {MAX_LIST_NAME_LENGTH} characters"
        )));
    }
    Ok(name.to_string())
}

/// Trim a description; blank input becomes `None`.
pub fn normalize_description(raw: Option<&str>) -> Result<Option<String>, CoreError> {
    let Some(text) = raw.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    if text.chars().count() > MAX_LIST_DESCRIPTION_LENGTH {
        return Err(CoreError::Validation(format!(
            "List description exceeds maximum length of {MAX_LIST_DESCRIPTION_LENGTH} characters"
        )));
    }
    Ok(Some(text.to_string()))
}

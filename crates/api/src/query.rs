//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped with `letssee_core::search::clamp_limit` /
/// `clamp_offset` before reaching the repositories.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// `(limit, offset)` after clamping.
    pub fn clamped(&self) -> (i64, i64) {
        (
            letssee_core::search::clamp_limit(self.limit),
            letssee_core::search::clamp_offset(self.offset),
        )
    }
}

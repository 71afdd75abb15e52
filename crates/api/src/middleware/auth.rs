//! Access-token authentication extractor for Axum handlers.

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use letssee_core::error::CoreError;
use letssee_core::types::UserId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Cookie the web client stores the provider's access token in.
pub const ACCESS_TOKEN_COOKIE: &str = "sb-access-token";

/// Authenticated user extracted from the access token.
///
/// The token is read from `Authorization: Bearer <token>`, falling back to
/// the `sb-access-token` cookie. Handlers taking this extractor never run
/// for anonymous requests:
///
/// ```ignore
/// async fn my_handler(auth: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %auth.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The provider's user id (from `claims.sub`).
    pub user_id: UserId,
    pub email: Option<String>,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .or_else(|| cookie_token(parts))
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing access token".into(),
                ))
            })?;

        authenticate(&token, state)
    }
}

/// `Option<AuthUser>` for routes readable anonymously.
///
/// No token yields `None`; a token that fails verification is still a 401.
impl OptionalFromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        match bearer_token(parts).or_else(|| cookie_token(parts)) {
            Some(token) => authenticate(&token, state).map(Some),
            None => Ok(None),
        }
    }
}

/// Verify a raw token against the configured secret.
pub fn authenticate(token: &str, state: &AppState) -> Result<AuthUser, AppError> {
    let claims = validate_token(token, &state.config.auth).map_err(|_| {
        AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
    })?;

    Ok(AuthUser {
        user_id: claims.sub,
        email: claims.email,
    })
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn cookie_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == ACCESS_TOKEN_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts(header: (&str, &str)) -> Parts {
        let (parts, _) = Request::builder()
            .header(header.0, header.1)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn reads_bearer_header() {
        let p = parts(("authorization", "Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&p).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn ignores_other_schemes() {
        let p = parts(("authorization", "Basic dXNlcjpwYXNz"));
        assert_eq!(bearer_token(&p), None);
    }

    #[test]
    fn reads_session_cookie() {
        let p = parts(("cookie", "theme=dark; sb-access-token=tok123; other=1"));
        assert_eq!(cookie_token(&p).as_deref(), Some("tok123"));
    }

    #[test]
    fn missing_cookie_is_none() {
        let p = parts(("cookie", "theme=dark"));
        assert_eq!(cookie_token(&p), None);
    }
}

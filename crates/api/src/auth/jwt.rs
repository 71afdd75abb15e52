//! Verification of provider-issued access tokens.
//!
//! The managed auth provider signs HS256 JWTs whose `sub` is the user's UUID
//! and whose `aud` is `authenticated` for signed-in users. This server never
//! issues tokens; it only verifies them.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default audience claim for signed-in users.
pub const DEFAULT_AUDIENCE: &str = "authenticated";

/// JWT claims read from every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's id at the auth provider.
    pub sub: Uuid,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Audience, `authenticated` for signed-in users.
    pub aud: String,
    /// Provider role (e.g. `"authenticated"`).
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Configuration for token verification.
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC-SHA256 secret shared with the auth provider.
    pub secret: String,
    /// Required `aud` claim.
    pub audience: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"***")
            .field("audience", &self.audience)
            .finish()
    }
}

impl AuthConfig {
    /// Load verification settings from environment variables.
    ///
    /// | Env Var             | Required | Default         |
    /// |---------------------|----------|-----------------|
    /// | `AUTH_JWT_SECRET`   | **yes**  | --              |
    /// | `AUTH_JWT_AUDIENCE` | no       | `authenticated` |
    ///
    /// # Panics
    ///
    /// Panics if `AUTH_JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret = std::env::var("AUTH_JWT_SECRET")
            .expect("AUTH_JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "AUTH_JWT_SECRET must not be empty");

        let audience =
            std::env::var("AUTH_JWT_AUDIENCE").unwrap_or_else(|_| DEFAULT_AUDIENCE.into());

        Self { secret, audience }
    }
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Checks the HS256 signature, expiration and audience.
pub fn validate_token(
    token: &str,
    config: &AuthConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[config.audience.as_str()]);
    validation.set_required_spec_claims(&["exp", "sub", "aud"]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}

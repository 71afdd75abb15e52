//! TMDB gateway configuration.

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_TIMEOUT_SECS: u64 = 8;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_REGION: &str = "US";

/// How requests authenticate against TMDB.
#[derive(Clone, PartialEq, Eq)]
pub enum TmdbCredential {
    /// v4 read access token, sent as `Authorization: Bearer`.
    Bearer(String),
    /// v3 API key, sent as the `api_key` query parameter.
    ApiKey(String),
}

impl TmdbCredential {
    /// Pick the scheme from the key's shape: v4 tokens are JWTs, v3 keys
    /// are 32 hex characters.
    pub fn from_key(key: &str) -> Self {
        let key = key.trim();
        if key.starts_with("eyJ") && key.matches('.').count() == 2 {
            TmdbCredential::Bearer(key.to_string())
        } else {
            TmdbCredential::ApiKey(key.to_string())
        }
    }
}

impl std::fmt::Debug for TmdbCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TmdbCredential::Bearer(_) => f.write_str("Bearer(***)"),
            TmdbCredential::ApiKey(_) => f.write_str("ApiKey(***)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TmdbConfig {
    pub credential: TmdbCredential,
    /// Base URL including the API version, without a trailing slash.
    pub base_url: String,
    /// Timeout for a single attempt.
    pub timeout_secs: u64,
    /// Total attempts per call, including the first.
    pub max_attempts: u32,
    /// Watch provider region used when the client does not ask for one.
    pub default_region: String,
}

impl TmdbConfig {
    /// Configuration with defaults for everything but the key.
    pub fn new(api_key: &str) -> Self {
        Self {
            credential: TmdbCredential::from_key(api_key),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            default_region: DEFAULT_REGION.to_string(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v3_key_uses_query_parameter() {
        let cred = TmdbCredential::from_key("0123456789abcdef0123456789abcdef");
        assert!(matches!(cred, TmdbCredential::ApiKey(_)));
    }

    #[test]
    fn v4_token_uses_bearer() {
        let cred = TmdbCredential::from_key("eyJhbGciOiJIUzI1NiJ9.eyJhdWQiOiJ4In0.c2ln");
        assert!(matches!(cred, TmdbCredential::Bearer(_)));
    }

    #[test]
    fn debug_hides_secret() {
        let cred = TmdbCredential::ApiKey("supersecret".to_string());
        assert!(!format!("{cred:?}").contains("supersecret"));
    }

    #[test]
    fn defaults() {
        let config = TmdbConfig::new("key");
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.timeout(), Duration::from_secs(8));
        assert_eq!(config.default_region, "US");
    }
}

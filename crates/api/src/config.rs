use letssee_tmdb::config::{
    DEFAULT_BASE_URL, DEFAULT_MAX_ATTEMPTS, DEFAULT_REGION, DEFAULT_TIMEOUT_SECS,
};
use letssee_tmdb::TmdbConfig;

use crate::auth::jwt::AuthConfig;

/// Server configuration loaded from environment variables.
///
/// Everything except the auth secret and the TMDB key has a default suitable
/// for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Time allowed for in-flight requests to drain on shutdown (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Access-token verification settings.
    pub auth: AuthConfig,
    /// TMDB gateway settings.
    pub tmdb: TmdbConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    ///
    /// See [`AuthConfig::from_env`] and [`tmdb_from_env`] for the rest.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            auth: AuthConfig::from_env(),
            tmdb: tmdb_from_env(),
        }
    }
}

/// Load TMDB settings from environment variables.
///
/// | Env Var               | Required | Default                        |
/// |-----------------------|----------|--------------------------------|
/// | `TMDB_API_KEY`        | **yes**  | --                             |
/// | `TMDB_BASE_URL`       | no       | `https://api.themoviedb.org/3` |
/// | `TMDB_TIMEOUT_SECS`   | no       | `8`                            |
/// | `TMDB_MAX_ATTEMPTS`   | no       | `3`                            |
/// | `TMDB_DEFAULT_REGION` | no       | `US`                           |
///
/// `TMDB_API_KEY` may be a v3 key or a v4 read access token.
///
/// # Panics
///
/// Panics if `TMDB_API_KEY` is missing or empty, or a numeric value is malformed.
pub fn tmdb_from_env() -> TmdbConfig {
    let api_key =
        std::env::var("TMDB_API_KEY").expect("TMDB_API_KEY must be set in the environment");
    assert!(!api_key.trim().is_empty(), "TMDB_API_KEY must not be empty");

    let mut config = TmdbConfig::new(&api_key);

    config.base_url = std::env::var("TMDB_BASE_URL")
        .unwrap_or_else(|_| DEFAULT_BASE_URL.into())
        .trim_end_matches('/')
        .to_string();

    config.timeout_secs = std::env::var("TMDB_TIMEOUT_SECS")
        .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
        .parse()
        .expect("TMDB_TIMEOUT_SECS must be a valid u64");

    config.max_attempts = std::env::var("TMDB_MAX_ATTEMPTS")
        .unwrap_or_else(|_| DEFAULT_MAX_ATTEMPTS.to_string())
        .parse()
        .expect("TMDB_MAX_ATTEMPTS must be a valid u32");

    config.default_region = std::env::var("TMDB_DEFAULT_REGION")
        .unwrap_or_else(|_| DEFAULT_REGION.into())
        .to_ascii_uppercase();

    config
}

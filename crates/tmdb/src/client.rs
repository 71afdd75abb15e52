//! REST client for the TMDB v3 API.

use letssee_core::media::{MediaKey, MediaType};
use letssee_core::search::{CatalogScope, DiscoverFilters, TrendingWindow};
use serde::de::DeserializeOwned;

use crate::config::{TmdbConfig, TmdbCredential};
use crate::error::TmdbError;
use crate::models::{Credits, Details, ErrorBody, ListingResult, Page, Season, WatchProviders};
use crate::retry::RetryPolicy;

/// HTTP client for TMDB. Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: reqwest::Client,
    config: TmdbConfig,
    retry: RetryPolicy,
}

impl TmdbClient {
    /// Build a client with the configured per-attempt timeout.
    pub fn new(config: TmdbConfig) -> Result<Self, TmdbError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(TmdbError::Request)?;
        Ok(Self::with_client(client, config))
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: TmdbConfig) -> Self {
        let retry = RetryPolicy::new(config.max_attempts);
        Self {
            client,
            config,
            retry,
        }
    }

    /// Override the retry policy (tests use a short base delay).
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn default_region(&self) -> &str {
        &self.config.default_region
    }

    // ---- catalog listings ----

    /// `GET /search/{multi|movie|tv}`.
    pub async fn search(
        &self,
        scope: CatalogScope,
        query: &str,
        page: u32,
    ) -> Result<Page<ListingResult>, TmdbError> {
        let path = format!("/search/{}", search_segment(scope));
        let page = page.to_string();
        self.get_json(
            &path,
            &[("query", query), ("page", &page), ("include_adult", "false")],
        )
        .await
    }

    /// `GET /discover/{movie|tv}`.
    pub async fn discover(
        &self,
        media_type: MediaType,
        page: u32,
        filters: &DiscoverFilters,
    ) -> Result<Page<ListingResult>, TmdbError> {
        let path = format!("/discover/{}", media_type.as_str());
        let page = page.to_string();
        let mut query = vec![
            ("page", page.as_str()),
            ("sort_by", filters.sort_by.as_str()),
            ("include_adult", "false"),
        ];
        if let Some(genres) = &filters.genres {
            query.push(("with_genres", genres.as_str()));
        }
        self.get_json(&path, &query).await
    }

    /// `GET /trending/{all|movie|tv}/{day|week}`.
    pub async fn trending(
        &self,
        scope: CatalogScope,
        window: TrendingWindow,
        page: u32,
    ) -> Result<Page<ListingResult>, TmdbError> {
        let segment = match scope {
            CatalogScope::Multi => "all",
            CatalogScope::Movie => "movie",
            CatalogScope::Tv => "tv",
        };
        let path = format!("/trending/{segment}/{window}");
        let page = page.to_string();
        self.get_json(&path, &[("page", page.as_str())]).await
    }

    // ---- single titles ----

    /// `GET /movie/{id}` or `GET /tv/{id}`.
    pub async fn details(&self, key: MediaKey) -> Result<Details, TmdbError> {
        self.get_json(&format!("/{}/{}", key.media_type, key.tmdb_id), &[])
            .await
    }

    pub async fn credits(&self, key: MediaKey) -> Result<Credits, TmdbError> {
        self.get_json(&format!("/{}/{}/credits", key.media_type, key.tmdb_id), &[])
            .await
    }

    pub async fn watch_providers(&self, key: MediaKey) -> Result<WatchProviders, TmdbError> {
        self.get_json(
            &format!("/{}/{}/watch/providers", key.media_type, key.tmdb_id),
            &[],
        )
        .await
    }

    /// `GET /tv/{id}/season/{n}`.
    pub async fn season(&self, show_id: i64, season_number: i32) -> Result<Season, TmdbError> {
        self.get_json(&format!("/tv/{show_id}/season/{season_number}"), &[])
            .await
    }

    // ---- private helpers ----

    /// GET `path` with retry and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, TmdbError> {
        self.retry
            .run(path, || self.try_get(path, query))
            .await
    }

    /// Execute a single attempt.
    async fn try_get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, TmdbError> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        let mut request = self.client.get(url).query(query);
        request = match &self.config.credential {
            TmdbCredential::Bearer(token) => request.bearer_auth(token),
            TmdbCredential::ApiKey(key) => request.query(&[("api_key", key.as_str())]),
        };

        let response = Self::ensure_success(request.send().await?).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| TmdbError::Decode(e.to_string()))
    }

    /// Map a non-2xx response to [`TmdbError::Api`], preferring TMDB's
    /// `status_message` over the raw body.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, TmdbError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.status_message)
            .unwrap_or(body);
        Err(TmdbError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

fn search_segment(scope: CatalogScope) -> &'static str {
    match scope {
        CatalogScope::Multi => "multi",
        CatalogScope::Movie => "movie",
        CatalogScope::Tv => "tv",
    }
}

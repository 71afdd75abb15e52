#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use letssee_api::auth::jwt::{AuthConfig, Claims};
use letssee_api::config::ServerConfig;
use letssee_api::router::build_app_router;
use letssee_api::state::AppState;
use letssee_api::ws::WsManager;
use letssee_tmdb::retry::RetryPolicy;
use letssee_tmdb::{TmdbClient, TmdbConfig};

pub const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Nothing listens here; tests that never touch the catalog use it.
const UNREACHABLE_TMDB: &str = "http://127.0.0.1:9/3";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(tmdb_base_url: &str) -> ServerConfig {
    let mut tmdb = TmdbConfig::new("test-v3-key");
    tmdb.base_url = tmdb_base_url.to_string();
    tmdb.timeout_secs = 2;

    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        auth: AuthConfig {
            secret: TEST_JWT_SECRET.to_string(),
            audience: "authenticated".to_string(),
        },
        tmdb,
    }
}

/// State for tests that need to reach into the WebSocket manager.
pub fn test_state(pool: PgPool, tmdb_base_url: &str) -> AppState {
    let config = test_config(tmdb_base_url);
    let tmdb = TmdbClient::new(config.tmdb.clone())
        .expect("test TMDB client")
        .with_retry(RetryPolicy {
            max_attempts: 2,
            base_delay: Duration::from_millis(5),
        });

    AppState {
        pool,
        config: Arc::new(config),
        tmdb,
        ws_manager: Arc::new(WsManager::new()),
    }
}

/// Build the full application router (same middleware stack as production).
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_tmdb(pool, UNREACHABLE_TMDB)
}

pub fn build_test_app_with_tmdb(pool: PgPool, tmdb_base_url: &str) -> Router {
    let state = test_state(pool, tmdb_base_url);
    let config = state.config.clone();
    build_app_router(state, &config)
}

pub fn build_test_app_from_state(state: AppState) -> Router {
    let config = state.config.clone();
    build_app_router(state, &config)
}

/// Serve `router` on an ephemeral port and return its base URL with `/3`.
pub async fn spawn_fake_tmdb(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/3")
}

/// Sign an access token the way the auth provider does.
pub fn token_for(user_id: Uuid) -> String {
    let claims = Claims {
        sub: user_id,
        exp: chrono::Utc::now().timestamp() + 3600,
        aud: "authenticated".to_string(),
        role: Some("authenticated".to_string()),
        email: Some(format!("{}@example.test", user_id.simple())),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    user: Option<Uuid>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header("authorization", format!("Bearer {}", token_for(user)));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, user: Uuid) -> Response<Body> {
    send(app, Method::GET, uri, Some(user), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    user: Uuid,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(user), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, user: Uuid) -> Response<Body> {
    send(app, Method::POST, uri, Some(user), None).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    user: Uuid,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(user), Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, None, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None, None).await
}

pub async fn delete_auth(app: Router, uri: &str, user: Uuid) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(user), None).await
}

/// Read the whole body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a profile through the API and return the user id.
pub async fn create_user(app: &Router, username: &str, visibility: &str) -> Uuid {
    let user = Uuid::new_v4();
    let response = put_json_auth(
        app.clone(),
        "/api/v1/profile",
        user,
        serde_json::json!({ "username": username, "visibility": visibility }),
    )
    .await;
    assert_eq!(response.status(), 200, "profile setup for {username} failed");
    user
}

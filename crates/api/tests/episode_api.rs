//! Integration tests for episode progress and catalog-driven backfill.

mod common;

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use common::{body_json, delete_auth, get_auth, post_json_auth, put_json_auth};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Fake catalog: show 1396 with specials, a 3-episode S1 and a 2-episode S2
// ---------------------------------------------------------------------------

async fn show_details() -> Json<serde_json::Value> {
    Json(json!({
        "id": 1396,
        "name": "Breaking Bad",
        "seasons": [
            { "id": 10, "season_number": 0, "episode_count": 1 },
            { "id": 11, "season_number": 1, "episode_count": 3 },
            { "id": 12, "season_number": 2, "episode_count": 2 },
        ],
    }))
}

async fn season(
    State(hits): State<Arc<AtomicU32>>,
    Path((_show, number)): Path<(i64, i32)>,
) -> Json<serde_json::Value> {
    hits.fetch_add(1, Ordering::SeqCst);
    let count = match number {
        0 => 1,
        1 => 3,
        _ => 2,
    };
    let episodes: Vec<_> = (1..=count)
        .map(|e| json!({ "id": number * 100 + e, "season_number": number, "episode_number": e }))
        .collect();
    Json(json!({ "id": 10 + number, "season_number": number, "episodes": episodes }))
}

async fn fake_catalog() -> (String, Arc<AtomicU32>) {
    let hits = Arc::new(AtomicU32::new(0));
    let router = Router::new()
        .route("/3/tv/1396", get(show_details))
        .route("/3/tv/{show}/season/{number}", get(season))
        .with_state(hits.clone());
    (common::spawn_fake_tmdb(router).await, hits)
}

// ---------------------------------------------------------------------------
// Test: marking is idempotent and unmarking removes the row
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn mark_is_idempotent(pool: PgPool) {
    let app = common::build_test_app(pool);
    let user = Uuid::new_v4();
    let body = json!({ "season_number": 1, "episode_number": 2 });

    let response = post_json_auth(app.clone(), "/api/v1/shows/1396/episodes", user, body.clone()).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json_auth(app.clone(), "/api/v1/shows/1396/episodes", user, body).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["created"], false);

    let response = get_auth(app.clone(), "/api/v1/shows/1396/episodes", user).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["total_watched"], 1);
    assert_eq!(
        json["data"]["seasons"],
        json!([{ "season_number": 1, "watched_count": 1 }])
    );

    let response = delete_auth(app.clone(), "/api/v1/shows/1396/episodes/1/2", user).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app, "/api/v1/shows/1396/episodes", user).await;
    assert_eq!(body_json(response).await["data"]["total_watched"], 0);
}

// ---------------------------------------------------------------------------
// Test: negative numbers are rejected
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn invalid_episode_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/shows/1396/episodes",
        Uuid::new_v4(),
        json!({ "season_number": 1, "episode_number": 0 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: backfill "all" skips specials and existing rows
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn backfill_all_skips_specials_and_existing(pool: PgPool) {
    let (base, season_hits) = fake_catalog().await;
    let app = common::build_test_app_with_tmdb(pool, &base);
    let user = Uuid::new_v4();

    post_json_auth(
        app.clone(),
        "/api/v1/shows/1396/episodes",
        user,
        json!({ "season_number": 1, "episode_number": 1 }),
    )
    .await;

    let response = post_json_auth(app.clone(), "/api/v1/shows/1396/backfill", user, json!({ "scope": "all" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["requested"], 5);
    assert_eq!(json["data"]["inserted"], 4);
    assert_eq!(json["data"]["seasons"], json!([1, 2]));
    assert_eq!(season_hits.load(Ordering::SeqCst), 2);

    let response = get_auth(app, "/api/v1/shows/1396/episodes", user).await;
    assert_eq!(body_json(response).await["data"]["total_watched"], 5);
}

// ---------------------------------------------------------------------------
// Test: backfill "through" stops at the named episode
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn backfill_through_stops_at_episode(pool: PgPool) {
    let (base, _) = fake_catalog().await;
    let app = common::build_test_app_with_tmdb(pool, &base);
    let user = Uuid::new_v4();

    let response = post_json_auth(
        app.clone(),
        "/api/v1/shows/1396/backfill",
        user,
        json!({ "scope": "through", "season": 2, "episode": 1 }),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["inserted"], 4);

    let response = get_auth(app, "/api/v1/shows/1396/episodes", user).await;
    let json = body_json(response).await;
    assert_eq!(
        json["data"]["seasons"],
        json!([
            { "season_number": 1, "watched_count": 3 },
            { "season_number": 2, "watched_count": 1 },
        ])
    );
}

// ---------------------------------------------------------------------------
// Test: backfill of a season the show lacks is a validation error
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn backfill_unknown_season_returns_400(pool: PgPool) {
    let (base, season_hits) = fake_catalog().await;
    let app = common::build_test_app_with_tmdb(pool, &base);

    let response = post_json_auth(
        app,
        "/api/v1/shows/1396/backfill",
        Uuid::new_v4(),
        json!({ "scope": "season", "season": 9 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(season_hits.load(Ordering::SeqCst), 0);
}

// ---------------------------------------------------------------------------
// Test: a "through" backfill ending in specials is a validation error
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn backfill_through_specials_returns_400(pool: PgPool) {
    let (base, season_hits) = fake_catalog().await;
    let app = common::build_test_app_with_tmdb(pool.clone(), &base);

    let response = post_json_auth(
        app,
        "/api/v1/shows/1396/backfill",
        Uuid::new_v4(),
        json!({ "scope": "through", "season": 0, "episode": 3 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    assert_eq!(season_hits.load(Ordering::SeqCst), 0);

    let marked: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM watched_episodes")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(marked, 0);
}

// ---------------------------------------------------------------------------
// Test: catalog outage surfaces as 502 and marks nothing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn backfill_with_catalog_down_returns_502(pool: PgPool) {
    let app = common::build_test_app(pool);
    let user = Uuid::new_v4();

    let response = post_json_auth(app.clone(), "/api/v1/shows/1396/backfill", user, json!({ "scope": "all" })).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let response = get_auth(app, "/api/v1/shows/1396/episodes", user).await;
    assert_eq!(body_json(response).await["data"]["total_watched"], 0);
}

// ---------------------------------------------------------------------------
// Test: dropping a show from watched clears its episode progress
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn unwatching_show_clears_episodes(pool: PgPool) {
    let app = common::build_test_app(pool);
    let user = Uuid::new_v4();

    put_json_auth(app.clone(), "/api/v1/preferences/tv/1396/watched", user, json!({})).await;
    post_json_auth(
        app.clone(),
        "/api/v1/shows/1396/episodes",
        user,
        json!({ "season_number": 1, "episode_number": 1 }),
    )
    .await;

    let response = delete_auth(app.clone(), "/api/v1/preferences/tv/1396/watched", user).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(app, "/api/v1/shows/1396/episodes", user).await;
    assert_eq!(body_json(response).await["data"]["total_watched"], 0);
}

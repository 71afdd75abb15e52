//! Integration tests for episode progress: idempotent marks and chunked backfill.

use letssee_core::episodes::{EpisodeKey, BACKFILL_CHUNK_SIZE};
use letssee_core::profiles::default_username;
use letssee_db::repositories::{EpisodeRepo, ProfileRepo};
use sqlx::PgPool;
use uuid::Uuid;

const SHOW: i64 = 1396;

async fn new_user(pool: &PgPool) -> Uuid {
    let id = Uuid::new_v4();
    ProfileRepo::ensure(pool, id, &default_username(id))
        .await
        .unwrap();
    id
}

fn ep(season: i32, episode: i32) -> EpisodeKey {
    EpisodeKey::new(season, episode).unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_mark_twice_is_idempotent(pool: PgPool) {
    let user = new_user(&pool).await;

    assert!(EpisodeRepo::mark(&pool, user, SHOW, ep(1, 1)).await.unwrap());
    assert!(!EpisodeRepo::mark(&pool, user, SHOW, ep(1, 1)).await.unwrap());

    let rows = EpisodeRepo::list_for_show(&pool, user, SHOW).await.unwrap();
    assert_eq!(rows.len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unmark(pool: PgPool) {
    let user = new_user(&pool).await;
    EpisodeRepo::mark(&pool, user, SHOW, ep(2, 3)).await.unwrap();

    assert!(EpisodeRepo::unmark(&pool, user, SHOW, ep(2, 3)).await.unwrap());
    assert!(!EpisodeRepo::unmark(&pool, user, SHOW, ep(2, 3)).await.unwrap());
    assert!(EpisodeRepo::list_for_show(&pool, user, SHOW)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_is_ordered_by_season_then_episode(pool: PgPool) {
    let user = new_user(&pool).await;
    for key in [ep(2, 1), ep(1, 2), ep(1, 1)] {
        EpisodeRepo::mark(&pool, user, SHOW, key).await.unwrap();
    }

    let rows = EpisodeRepo::list_for_show(&pool, user, SHOW).await.unwrap();
    let keys: Vec<_> = rows
        .iter()
        .map(|r| (r.season_number, r.episode_number))
        .collect();
    assert_eq!(keys, vec![(1, 1), (1, 2), (2, 1)]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_bulk_mark_spans_chunks_and_skips_existing(pool: PgPool) {
    let user = new_user(&pool).await;
    EpisodeRepo::mark(&pool, user, SHOW, ep(1, 1)).await.unwrap();

    // Two full chunks plus a partial one.
    let total = (BACKFILL_CHUNK_SIZE * 2 + 17) as i32;
    let keys: Vec<_> = (1..=total).map(|n| ep(1, n)).collect();

    let inserted = EpisodeRepo::bulk_mark(&pool, user, SHOW, &keys).await.unwrap();
    assert_eq!(inserted, (total - 1) as u64);

    let again = EpisodeRepo::bulk_mark(&pool, user, SHOW, &keys).await.unwrap();
    assert_eq!(again, 0);

    let rows = EpisodeRepo::list_for_show(&pool, user, SHOW).await.unwrap();
    assert_eq!(rows.len(), total as usize);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_clear_show_only_touches_that_show(pool: PgPool) {
    let user = new_user(&pool).await;
    EpisodeRepo::bulk_mark(&pool, user, SHOW, &[ep(1, 1), ep(1, 2)])
        .await
        .unwrap();
    EpisodeRepo::mark(&pool, user, 60059, ep(1, 1)).await.unwrap();

    assert_eq!(EpisodeRepo::clear_show(&pool, user, SHOW).await.unwrap(), 2);
    assert_eq!(
        EpisodeRepo::list_for_show(&pool, user, 60059)
            .await
            .unwrap()
            .len(),
        1
    );
}

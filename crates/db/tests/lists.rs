//! Integration tests for custom lists.

use letssee_core::media::{MediaKey, MediaSnapshot, MediaType};
use letssee_core::profiles::default_username;
use letssee_db::models::list::{CreateList, UpdateList};
use letssee_db::models::profile::UpsertProfile;
use letssee_db::repositories::{ListRepo, ProfileRepo};
use sqlx::PgPool;
use uuid::Uuid;

async fn new_user(pool: &PgPool) -> Uuid {
    let id = Uuid::new_v4();
    ProfileRepo::ensure(pool, id, &default_username(id))
        .await
        .unwrap();
    id
}

fn new_list(name: &str, is_public: bool) -> CreateList {
    CreateList {
        name: name.to_string(),
        description: None,
        is_public,
    }
}

fn tv(id: i64) -> MediaKey {
    MediaKey::new(MediaType::Tv, id).unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_and_find(pool: PgPool) {
    let user = new_user(&pool).await;
    let list = ListRepo::create(&pool, user, &new_list("Comfort shows", true))
        .await
        .unwrap();

    assert_eq!(list.user_id, user);
    assert_eq!(list.item_count, 0);

    let found = ListRepo::find_by_id(&pool, list.id).await.unwrap().unwrap();
    assert_eq!(found.name, "Comfort shows");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_add_item_appends_and_is_idempotent(pool: PgPool) {
    let user = new_user(&pool).await;
    let list = ListRepo::create(&pool, user, &new_list("Queue", true))
        .await
        .unwrap();
    let meta = MediaSnapshot {
        title: Some("Breaking Bad".to_string()),
        ..Default::default()
    };

    let first = ListRepo::add_item(&pool, list.id, tv(1396), &meta, None)
        .await
        .unwrap();
    let second = ListRepo::add_item(&pool, list.id, tv(1399), &MediaSnapshot::default(), None)
        .await
        .unwrap();
    let again = ListRepo::add_item(&pool, list.id, tv(1396), &MediaSnapshot::default(), None)
        .await
        .unwrap();

    assert_eq!(first.position, 0);
    assert_eq!(second.position, 1);
    assert_eq!(again.id, first.id);
    assert_eq!(again.title.as_deref(), Some("Breaking Bad"));
    assert_eq!(ListRepo::count_items(&pool, list.id).await.unwrap(), 2);

    let items = ListRepo::items(&pool, list.id).await.unwrap();
    assert_eq!(items[0].tmdb_id, 1396);
    assert_eq!(items[1].tmdb_id, 1399);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_remove_item(pool: PgPool) {
    let user = new_user(&pool).await;
    let list = ListRepo::create(&pool, user, &new_list("Queue", true))
        .await
        .unwrap();
    ListRepo::add_item(&pool, list.id, tv(1), &MediaSnapshot::default(), None)
        .await
        .unwrap();

    assert!(ListRepo::remove_item(&pool, list.id, tv(1)).await.unwrap());
    assert!(!ListRepo::remove_item(&pool, list.id, tv(1)).await.unwrap());
    assert!(!ListRepo::contains(&pool, list.id, tv(1)).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_private_lists_hidden_unless_requested(pool: PgPool) {
    let user = new_user(&pool).await;
    ListRepo::create(&pool, user, &new_list("Public", true))
        .await
        .unwrap();
    ListRepo::create(&pool, user, &new_list("Secret", false))
        .await
        .unwrap();

    let all = ListRepo::list_for_user(&pool, user, true).await.unwrap();
    let public = ListRepo::list_for_user(&pool, user, false).await.unwrap();

    assert_eq!(all.len(), 2);
    assert_eq!(public.len(), 1);
    assert_eq!(public[0].name, "Public");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_clears_description(pool: PgPool) {
    let user = new_user(&pool).await;
    let list = ListRepo::create(
        &pool,
        user,
        &CreateList {
            name: "Noir".to_string(),
            description: Some("Shadows".to_string()),
            is_public: true,
        },
    )
    .await
    .unwrap();

    let updated = ListRepo::update(
        &pool,
        list.id,
        &UpdateList {
            name: Some("Neo-noir".to_string()),
            description: Some(None),
            is_public: Some(false),
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.name, "Neo-noir");
    assert!(updated.description.is_none());
    assert!(!updated.is_public);

    let untouched = ListRepo::update(&pool, list.id, &UpdateList::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(untouched.name, "Neo-noir");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deleting_featured_list_clears_pointer(pool: PgPool) {
    let user = new_user(&pool).await;
    let list = ListRepo::create(&pool, user, &new_list("Best of", true))
        .await
        .unwrap();
    ProfileRepo::upsert(
        &pool,
        user,
        &UpsertProfile {
            featured_list_id: Some(Some(list.id)),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert!(ListRepo::delete(&pool, list.id).await.unwrap());

    let profile = ProfileRepo::find_by_id(&pool, user).await.unwrap().unwrap();
    assert!(profile.featured_list_id.is_none());
}

//! Integration tests for follows, follow requests and direct messages.

use letssee_core::media::{MediaKey, MediaSnapshot, MediaType};
use letssee_core::messaging::{MediaCard, MessageDraft};
use letssee_core::profiles::default_username;
use letssee_db::repositories::{FollowRepo, MessageRepo, ProfileRepo};
use sqlx::PgPool;
use uuid::Uuid;

async fn new_user(pool: &PgPool) -> Uuid {
    let id = Uuid::new_v4();
    ProfileRepo::ensure(pool, id, &default_username(id))
        .await
        .unwrap();
    id
}

fn text(body: &str) -> MessageDraft {
    MessageDraft::new(Some(body), None).unwrap()
}

// ---------------------------------------------------------------------------
// Follows
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_follow_is_idempotent(pool: PgPool) {
    let alice = new_user(&pool).await;
    let bob = new_user(&pool).await;

    assert!(FollowRepo::follow(&pool, alice, bob).await.unwrap());
    assert!(!FollowRepo::follow(&pool, alice, bob).await.unwrap());

    assert!(FollowRepo::is_following(&pool, alice, bob).await.unwrap());
    assert!(!FollowRepo::is_following(&pool, bob, alice).await.unwrap());
    assert!(FollowRepo::are_connected(&pool, bob, alice).await.unwrap());

    let counts = ProfileRepo::social_counts(&pool, bob, false).await.unwrap();
    assert_eq!(counts.followers_count, 1);
    assert_eq!(counts.following_count, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_request_then_accept(pool: PgPool) {
    let alice = new_user(&pool).await;
    let bob = new_user(&pool).await;

    let request = FollowRepo::request(&pool, alice, bob).await.unwrap().unwrap();
    assert!(FollowRepo::request(&pool, alice, bob).await.unwrap().is_none());
    assert!(FollowRepo::has_pending_request(&pool, alice, bob).await.unwrap());

    let incoming = FollowRepo::incoming(&pool, bob).await.unwrap();
    assert_eq!(incoming.len(), 1);
    assert_eq!(incoming[0].user_id, alice);

    let outgoing = FollowRepo::outgoing(&pool, alice).await.unwrap();
    assert_eq!(outgoing[0].user_id, bob);

    let connection = FollowRepo::accept(&pool, request.id).await.unwrap().unwrap();
    assert_eq!(connection.follower_id, alice);
    assert_eq!(connection.followee_id, bob);

    assert!(!FollowRepo::has_pending_request(&pool, alice, bob).await.unwrap());
    assert!(FollowRepo::accept(&pool, request.id).await.unwrap().is_none());

    let followers = FollowRepo::followers(&pool, bob, 10, 0).await.unwrap();
    assert_eq!(followers.len(), 1);
    assert_eq!(followers[0].id, alice);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_decline_and_unfollow(pool: PgPool) {
    let alice = new_user(&pool).await;
    let bob = new_user(&pool).await;

    let request = FollowRepo::request(&pool, alice, bob).await.unwrap().unwrap();
    assert!(FollowRepo::decline(&pool, request.id).await.unwrap());
    assert!(FollowRepo::find_request(&pool, request.id).await.unwrap().is_none());

    FollowRepo::request(&pool, alice, bob).await.unwrap();
    assert!(FollowRepo::unfollow(&pool, alice, bob).await.unwrap());
    assert!(!FollowRepo::has_pending_request(&pool, alice, bob).await.unwrap());
    assert!(!FollowRepo::unfollow(&pool, alice, bob).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_self_follow_rejected_by_schema(pool: PgPool) {
    let alice = new_user(&pool).await;
    let err = FollowRepo::follow(&pool, alice, alice).await.unwrap_err();
    assert!(err.to_string().contains("ck_connections_not_self"));
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_message_with_card_caches_snapshot(pool: PgPool) {
    let alice = new_user(&pool).await;
    let bob = new_user(&pool).await;

    let card = MediaCard {
        key: MediaKey::new(MediaType::Movie, 550).unwrap(),
        snapshot: MediaSnapshot {
            title: Some("Fight Club".to_string()),
            poster_path: Some("/fc.jpg".to_string()),
            release_date: None,
        },
    };
    let draft = MessageDraft::new(None, Some(card)).unwrap();
    let message = MessageRepo::create(&pool, alice, bob, &draft).await.unwrap();

    assert!(message.body.is_none());
    assert_eq!(message.media_type.as_deref(), Some("movie"));
    assert_eq!(message.tmdb_id, Some(550));
    assert_eq!(message.media_title.as_deref(), Some("Fight Club"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_thread_paginates_with_before_cursor(pool: PgPool) {
    let alice = new_user(&pool).await;
    let bob = new_user(&pool).await;

    let mut ids = Vec::new();
    for i in 0..5 {
        let (from, to) = if i % 2 == 0 { (alice, bob) } else { (bob, alice) };
        let msg = MessageRepo::create(&pool, from, to, &text(&format!("msg {i}")))
            .await
            .unwrap();
        ids.push(msg.id);
    }

    let page = MessageRepo::thread(&pool, alice, bob, None, 2).await.unwrap();
    assert_eq!(page.iter().map(|m| m.id).collect::<Vec<_>>(), vec![ids[4], ids[3]]);

    let older = MessageRepo::thread(&pool, bob, alice, Some(ids[3]), 10)
        .await
        .unwrap();
    assert_eq!(
        older.iter().map(|m| m.id).collect::<Vec<_>>(),
        vec![ids[2], ids[1], ids[0]]
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_conversations_and_unread(pool: PgPool) {
    let alice = new_user(&pool).await;
    let bob = new_user(&pool).await;
    let carol = new_user(&pool).await;

    MessageRepo::create(&pool, bob, alice, &text("hey")).await.unwrap();
    MessageRepo::create(&pool, bob, alice, &text("you there?")).await.unwrap();
    MessageRepo::create(&pool, alice, carol, &text("watch this")).await.unwrap();

    assert_eq!(MessageRepo::unread_count(&pool, alice).await.unwrap(), 2);

    let conversations = MessageRepo::conversations(&pool, alice).await.unwrap();
    assert_eq!(conversations.len(), 2);
    assert_eq!(conversations[0].user_id, carol);
    assert_eq!(conversations[0].unread_count, 0);
    assert_eq!(conversations[1].user_id, bob);
    assert_eq!(conversations[1].unread_count, 2);
    assert_eq!(
        conversations[1].last_message_body.as_deref(),
        Some("you there?")
    );

    assert_eq!(MessageRepo::mark_thread_read(&pool, alice, bob).await.unwrap(), 2);
    assert_eq!(MessageRepo::unread_count(&pool, alice).await.unwrap(), 0);
    assert_eq!(MessageRepo::unread_count(&pool, bob).await.unwrap(), 0);
}

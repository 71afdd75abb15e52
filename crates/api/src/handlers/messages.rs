//! Direct messages between users, optionally carrying a media card.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use letssee_core::messaging::{check_can_message, MediaCard, MessageDraft};
use letssee_core::search::clamp_limit;
use letssee_core::types::{DbId, UserId};
use letssee_db::repositories::{FollowRepo, MessageRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::profiles::find_profile;
use crate::handlers::{ensure_profile, MediaRef};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::ws::RealtimeEvent;

#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    pub recipient_id: UserId,
    #[validate(length(max = 2000))]
    pub body: Option<String>,
    #[validate(nested)]
    pub media: Option<MediaRef>,
}

#[derive(Debug, Deserialize)]
pub struct ThreadParams {
    /// Only messages with an id below this cursor.
    pub before: Option<DbId>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub unread_count: i64,
}

#[derive(Debug, Serialize)]
pub struct MarkReadResponse {
    pub marked: u64,
}

/// POST /api/v1/messages
///
/// Private recipients only accept messages from users connected to them in
/// either direction. The recipient is notified in realtime.
pub async fn send_message(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SendMessageRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let card = match &input.media {
        Some(media) => Some(MediaCard {
            key: media.key()?,
            snapshot: media.snapshot()?,
        }),
        None => None,
    };
    let draft = MessageDraft::new(input.body.as_deref(), card)?;

    let recipient_id = input.recipient_id;
    if recipient_id == auth.user_id {
        return Err(AppError::BadRequest("You cannot message yourself".into()));
    }
    let recipient = find_profile(&state, recipient_id).await?;
    let connected = recipient.visibility.is_private()
        && FollowRepo::are_connected(&state.pool, auth.user_id, recipient_id).await?;
    check_can_message(auth.user_id, recipient_id, recipient.visibility, connected)?;

    ensure_profile(&state, auth.user_id).await?;
    let message = MessageRepo::create(&state.pool, auth.user_id, recipient_id, &draft).await?;

    tracing::info!(
        user_id = %auth.user_id,
        %recipient_id,
        message_id = message.id,
        has_media = message.tmdb_id.is_some(),
        "Message sent",
    );
    state
        .ws_manager
        .push(recipient_id, &RealtimeEvent::MessageCreated(message.clone()))
        .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: message })))
}

/// GET /api/v1/messages/conversations
pub async fn conversations(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let conversations = MessageRepo::conversations(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: conversations,
    }))
}

/// GET /api/v1/messages/with/{user_id}?before=&limit=
///
/// Newest first. Pass the smallest id received as `before` for the next page.
pub async fn thread(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(other_id): Path<UserId>,
    Query(params): Query<ThreadParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit);
    let messages =
        MessageRepo::thread(&state.pool, auth.user_id, other_id, params.before, limit).await?;
    Ok(Json(DataResponse { data: messages }))
}

/// POST /api/v1/messages/with/{user_id}/read
///
/// Marks every unread message from `user_id` to the caller as read.
pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(other_id): Path<UserId>,
) -> AppResult<impl IntoResponse> {
    let marked = MessageRepo::mark_thread_read(&state.pool, auth.user_id, other_id).await?;
    if marked > 0 {
        tracing::debug!(user_id = %auth.user_id, %other_id, marked, "Thread marked read");
    }
    Ok(Json(DataResponse {
        data: MarkReadResponse { marked },
    }))
}

/// GET /api/v1/messages/unread-count
pub async fn unread_count(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let unread_count = MessageRepo::unread_count(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: UnreadCount { unread_count },
    }))
}

//! Follow graph: follows, pending requests, follower listings.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use letssee_core::error::CoreError;
use letssee_core::profiles::can_view;
use letssee_core::types::{DbId, UserId};
use letssee_db::models::follow::{FollowRequest, FollowStatus};
use letssee_db::repositories::{FollowRepo, ProfileRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::handlers::ensure_profile;
use crate::handlers::profiles::{find_profile, relationship};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::ws::RealtimeEvent;

#[derive(Debug, Serialize)]
pub struct FollowResponse {
    pub user_id: UserId,
    pub status: FollowStatus,
}

// ---------------------------------------------------------------------------
// Follow / unfollow
// ---------------------------------------------------------------------------

/// POST /api/v1/follows/{user_id}
///
/// Public targets are followed immediately; private targets receive a
/// request. Repeating either is a no-op.
pub async fn follow(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(target_id): Path<UserId>,
) -> AppResult<impl IntoResponse> {
    if target_id == auth.user_id {
        return Err(AppError::BadRequest("You cannot follow yourself".into()));
    }
    let target = find_profile(&state, target_id).await?;
    ensure_profile(&state, auth.user_id).await?;

    let status = if !target.visibility.is_private()
        || FollowRepo::is_following(&state.pool, auth.user_id, target_id).await?
    {
        if FollowRepo::follow(&state.pool, auth.user_id, target_id).await? {
            tracing::info!(user_id = %auth.user_id, %target_id, "User followed");
        }
        FollowStatus::Following
    } else {
        if let Some(request) = FollowRepo::request(&state.pool, auth.user_id, target_id).await? {
            tracing::info!(
                user_id = %auth.user_id,
                %target_id,
                request_id = request.id,
                "Follow request created",
            );
            state
                .ws_manager
                .push(target_id, &RealtimeEvent::FollowRequestCreated(request))
                .await;
        }
        FollowStatus::Requested
    };

    Ok(Json(DataResponse {
        data: FollowResponse {
            user_id: target_id,
            status,
        },
    }))
}

/// DELETE /api/v1/follows/{user_id}
///
/// Removes the connection and any pending request.
pub async fn unfollow(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(target_id): Path<UserId>,
) -> AppResult<StatusCode> {
    if FollowRepo::unfollow(&state.pool, auth.user_id, target_id).await? {
        tracing::info!(user_id = %auth.user_id, %target_id, "User unfollowed");
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// GET /api/v1/follow-requests/incoming
pub async fn incoming_requests(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let requests = FollowRepo::incoming(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: requests }))
}

/// GET /api/v1/follow-requests/outgoing
pub async fn outgoing_requests(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let requests = FollowRepo::outgoing(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: requests }))
}

/// POST /api/v1/follow-requests/{id}/accept
///
/// Only the target may accept. The requester is notified in realtime.
pub async fn accept_request(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let request = find_own_request(&state, id, auth.user_id).await?;

    let connection = FollowRepo::accept(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Follow request",
            id,
        })?;

    tracing::info!(
        user_id = %auth.user_id,
        requester_id = %request.requester_id,
        request_id = id,
        "Follow request accepted",
    );
    state
        .ws_manager
        .push(
            request.requester_id,
            &RealtimeEvent::FollowRequestAccepted(connection.clone()),
        )
        .await;

    Ok(Json(DataResponse { data: connection }))
}

/// POST /api/v1/follow-requests/{id}/decline
pub async fn decline_request(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let request = find_own_request(&state, id, auth.user_id).await?;

    if FollowRepo::decline(&state.pool, id).await? {
        tracing::info!(
            user_id = %auth.user_id,
            requester_id = %request.requester_id,
            request_id = id,
            "Follow request declined",
        );
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

/// GET /api/v1/users/{user_id}/followers
pub async fn followers(
    auth: Option<AuthUser>,
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    require_viewable(&state, auth.map(|a| a.user_id), user_id).await?;
    let (limit, offset) = params.clamped();
    let users = FollowRepo::followers(&state.pool, user_id, limit, offset).await?;
    Ok(Json(DataResponse { data: users }))
}

/// GET /api/v1/users/{user_id}/following
pub async fn following(
    auth: Option<AuthUser>,
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    require_viewable(&state, auth.map(|a| a.user_id), user_id).await?;
    let (limit, offset) = params.clamped();
    let users = FollowRepo::following(&state.pool, user_id, limit, offset).await?;
    Ok(Json(DataResponse { data: users }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a request addressed to `user_id`; anyone else gets 403.
async fn find_own_request(
    state: &AppState,
    id: DbId,
    user_id: UserId,
) -> AppResult<FollowRequest> {
    let request = FollowRepo::find_request(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Follow request",
            id,
        })?;
    if request.target_id != user_id {
        return Err(CoreError::Forbidden(
            "Only the recipient can respond to a follow request".into(),
        )
        .into());
    }
    Ok(request)
}

/// 404 for unknown users, 403 when the viewer may not see the profile.
pub(crate) async fn require_viewable(
    state: &AppState,
    viewer: Option<UserId>,
    user_id: UserId,
) -> AppResult<()> {
    let profile = ProfileRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| CoreError::NotFoundByKey {
            entity: "User",
            key: user_id.to_string(),
        })?;
    let rel = relationship(state, viewer, user_id).await?;
    if !can_view(profile.visibility, rel) {
        return Err(CoreError::Forbidden("This profile is private".into()).into());
    }
    Ok(())
}

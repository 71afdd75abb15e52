//! Profiles: the caller's own profile and the public profile page.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use letssee_core::error::CoreError;
use letssee_core::preferences::PreferenceKind;
use letssee_core::profiles::{
    can_view, normalize_username, validate_avatar_url, validate_bio, validate_display_name,
    Relationship, Visibility,
};
use letssee_core::types::{DbId, UserId};
use letssee_db::models::list::{UserList, UserListWithItems};
use letssee_db::models::media::LibraryEntry;
use letssee_db::models::profile::{Profile, SocialCounts, UpsertProfile, UserStats};
use letssee_db::models::watched::WatchedItem;
use letssee_db::repositories::{
    FollowRepo, ListRepo, PreferenceRepo, ProfileRepo, WatchedRepo,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::follows::require_viewable;
use crate::handlers::{double_option, ensure_profile};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// How many recent titles the profile page shows per section.
const PROFILE_SECTION_LIMIT: i64 = 12;

/// Patch for the caller's profile. Absent fields keep their value; `null`
/// clears the nullable ones.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 3, max = 30))]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub display_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub avatar_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub bio: Option<Option<String>>,
    pub visibility: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub featured_list_id: Option<Option<DbId>>,
    #[serde(default, deserialize_with = "double_option")]
    pub featured_review_id: Option<Option<DbId>>,
}

#[derive(Debug, Serialize)]
pub struct OwnProfile {
    #[serde(flatten)]
    pub profile: Profile,
    pub stats: UserStats,
}

/// The public profile page.
#[derive(Debug, Serialize)]
pub struct ProfilePage {
    pub id: UserId,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub visibility: Visibility,
    pub relationship: Relationship,
    pub is_restricted: bool,
    pub stats: UserStats,
    #[serde(flatten)]
    pub counts: SocialCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_list: Option<UserListWithItems>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_review: Option<WatchedItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_watched: Option<Vec<WatchedItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorites: Option<Vec<LibraryEntry>>,
}

// ---------------------------------------------------------------------------
// Own profile
// ---------------------------------------------------------------------------

/// GET /api/v1/profile
pub async fn get_profile(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    ensure_profile(&state, auth.user_id).await?;
    let (profile, stats) = tokio::try_join!(
        find_profile(&state, auth.user_id),
        async {
            ProfileRepo::stats(&state.pool, auth.user_id)
                .await
                .map_err(AppError::from)
        },
    )?;
    Ok(Json(DataResponse {
        data: OwnProfile { profile, stats },
    }))
}

/// PUT /api/v1/profile
///
/// Creates the profile on first call. A taken username is a 409.
pub async fn update_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let upsert = UpsertProfile {
        username: input.username.as_deref().map(normalize_username).transpose()?,
        display_name: clean_patch(input.display_name, validate_display_name)?,
        avatar_url: clean_patch(input.avatar_url, validate_avatar_url)?,
        bio: clean_patch(input.bio, validate_bio)?,
        visibility: input
            .visibility
            .as_deref()
            .map(str::parse::<Visibility>)
            .transpose()?,
        featured_list_id: input.featured_list_id,
        featured_review_id: input.featured_review_id,
    };

    if let Some(Some(list_id)) = upsert.featured_list_id {
        let owned = ListRepo::find_by_id(&state.pool, list_id)
            .await?
            .is_some_and(|l| l.user_id == auth.user_id);
        if !owned {
            return Err(AppError::BadRequest(
                "Featured list must be one of your lists".into(),
            ));
        }
    }
    if let Some(Some(review_id)) = upsert.featured_review_id {
        let valid = WatchedRepo::find_by_id(&state.pool, review_id)
            .await?
            .is_some_and(|w| {
                w.user_id == auth.user_id
                    && w.review_text.as_deref().is_some_and(|t| !t.trim().is_empty())
            });
        if !valid {
            return Err(AppError::BadRequest(
                "Featured review must be one of your reviews".into(),
            ));
        }
    }

    let profile = ProfileRepo::upsert(&state.pool, auth.user_id, &upsert).await?;

    tracing::info!(user_id = %auth.user_id, username = %profile.username, "Profile updated");

    Ok(Json(DataResponse { data: profile }))
}

// ---------------------------------------------------------------------------
// Public profile page
// ---------------------------------------------------------------------------

/// GET /api/v1/users/{username}
///
/// Header and counts are always returned. Libraries, featured items and
/// recent activity require the profile to be viewable.
pub async fn get_user_profile(
    auth: Option<AuthUser>,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<impl IntoResponse> {
    let viewer = auth.map(|a| a.user_id);
    let profile = ProfileRepo::find_by_username(&state.pool, username.trim())
        .await?
        .ok_or_else(|| CoreError::NotFoundByKey {
            entity: "User",
            key: username.clone(),
        })?;
    let user_id = profile.id;
    let is_own = viewer == Some(user_id);

    let (rel, stats, counts) = tokio::try_join!(
        relationship(&state, viewer, user_id),
        async {
            ProfileRepo::stats(&state.pool, user_id)
                .await
                .map_err(AppError::from)
        },
        async {
            ProfileRepo::social_counts(&state.pool, user_id, is_own)
                .await
                .map_err(AppError::from)
        },
    )?;
    let viewable = can_view(profile.visibility, rel);

    let mut page = ProfilePage {
        id: user_id,
        username: profile.username,
        display_name: profile.display_name,
        avatar_url: profile.avatar_url,
        bio: profile.bio,
        visibility: profile.visibility,
        relationship: rel,
        is_restricted: !viewable,
        stats,
        counts,
        featured_list: None,
        featured_review: None,
        recent_watched: None,
        favorites: None,
    };

    if viewable {
        let (featured_list, featured_review, recent, favorites) = tokio::try_join!(
            featured_list(&state, profile.featured_list_id, user_id, is_own),
            featured_review(&state, profile.featured_review_id, user_id),
            async {
                WatchedRepo::recent_for_user(&state.pool, user_id, PROFILE_SECTION_LIMIT)
                    .await
                    .map_err(AppError::from)
            },
            async {
                PreferenceRepo::list_library(
                    &state.pool,
                    user_id,
                    PreferenceKind::Favorite,
                    PROFILE_SECTION_LIMIT,
                    0,
                )
                .await
                .map_err(AppError::from)
            },
        )?;

        page.featured_list = featured_list;
        page.featured_review = featured_review.map(strip_diary);
        page.recent_watched = Some(if is_own {
            recent
        } else {
            recent.into_iter().map(strip_diary).collect()
        });
        page.favorites = Some(favorites);
    }

    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/users/{user_id}/library/{kind}?limit=&offset=
///
/// 403 when the profile is not viewable. Diary text only for the owner.
pub async fn get_user_library(
    auth: Option<AuthUser>,
    State(state): State<AppState>,
    Path((user_id, kind)): Path<(UserId, String)>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let viewer = auth.map(|a| a.user_id);
    let kind = PreferenceKind::parse(&kind)?;
    require_viewable(&state, viewer, user_id).await?;

    let (limit, offset) = params.clamped();
    let entries = PreferenceRepo::list_library(&state.pool, user_id, kind, limit, offset).await?;
    let entries: Vec<LibraryEntry> = if viewer == Some(user_id) {
        entries
    } else {
        entries.into_iter().map(LibraryEntry::without_diary).collect()
    };

    Ok(Json(DataResponse { data: entries }))
}

/// GET /api/v1/users/{user_id}/lists
///
/// Public lists, or every list when viewing your own profile.
pub async fn get_user_lists(
    auth: Option<AuthUser>,
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> AppResult<impl IntoResponse> {
    let viewer = auth.map(|a| a.user_id);
    require_viewable(&state, viewer, user_id).await?;

    let lists: Vec<UserList> =
        ListRepo::list_for_user(&state.pool, user_id, viewer == Some(user_id)).await?;
    Ok(Json(DataResponse { data: lists }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a profile by id or fail with 404.
pub(crate) async fn find_profile(state: &AppState, user_id: UserId) -> AppResult<Profile> {
    Ok(ProfileRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| CoreError::NotFoundByKey {
            entity: "User",
            key: user_id.to_string(),
        })?)
}

/// How `viewer` relates to `user_id`. Anonymous viewers are `None`.
pub(crate) async fn relationship(
    state: &AppState,
    viewer: Option<UserId>,
    user_id: UserId,
) -> AppResult<Relationship> {
    let Some(viewer) = viewer else {
        return Ok(Relationship::None);
    };
    if viewer == user_id {
        return Ok(Relationship::Own);
    }
    if FollowRepo::is_following(&state.pool, viewer, user_id).await? {
        return Ok(Relationship::Following);
    }
    if FollowRepo::has_pending_request(&state.pool, viewer, user_id).await? {
        return Ok(Relationship::Requested);
    }
    Ok(Relationship::None)
}

/// Trim a nullable text patch; blank input clears the column.
fn clean_patch(
    value: Option<Option<String>>,
    validate: fn(&str) -> Result<(), CoreError>,
) -> Result<Option<Option<String>>, CoreError> {
    let Some(inner) = value else {
        return Ok(None);
    };
    let cleaned = inner
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string);
    if let Some(text) = &cleaned {
        validate(text)?;
    }
    Ok(Some(cleaned))
}

fn strip_diary(mut item: WatchedItem) -> WatchedItem {
    item.diary_text = None;
    item
}

/// The featured list with its items, when the viewer may see it.
async fn featured_list(
    state: &AppState,
    list_id: Option<DbId>,
    owner: UserId,
    is_own: bool,
) -> AppResult<Option<UserListWithItems>> {
    let Some(list_id) = list_id else {
        return Ok(None);
    };
    let Some(list) = ListRepo::find_by_id(&state.pool, list_id).await? else {
        return Ok(None);
    };
    if list.user_id != owner || !(list.is_public || is_own) {
        return Ok(None);
    }
    let items = ListRepo::items(&state.pool, list_id).await?;
    Ok(Some(UserListWithItems { list, items }))
}

/// The featured review, when it still has review text.
async fn featured_review(
    state: &AppState,
    review_id: Option<DbId>,
    owner: UserId,
) -> AppResult<Option<WatchedItem>> {
    let Some(review_id) = review_id else {
        return Ok(None);
    };
    Ok(WatchedRepo::find_by_id(&state.pool, review_id)
        .await?
        .filter(|w| w.user_id == owner && w.review_text.is_some()))
}

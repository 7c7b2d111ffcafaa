//! User directory and profile request handlers.

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};

use hearth_core::auth::guard;
use hearth_core::models::auth::{IdentityFilter, ProfileUpdate, Role};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{ListUsersQuery, PublicUserResponse, UpdateProfileRequest, UserResponse};

/// `GET /api/users` — list users. Administrators only.
pub async fn list_users_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(identity)): Extension<AuthenticatedUser>,
    Query(query): Query<ListUsersQuery>,
) -> AppResult<Json<Vec<UserResponse>>> {
    guard::require_active(&identity)?;
    guard::require_role(&identity, &[Role::Admin])?;

    let users = state
        .store
        .list(IdentityFilter {
            role: query.role,
            active_only: false,
            offset: query.offset.unwrap_or(0),
            limit: query.limit,
        })
        .await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// `GET /api/users/{id}` — full user record. The account itself or an
/// administrator.
pub async fn get_user_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(identity)): Extension<AuthenticatedUser>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<UserResponse>> {
    guard::require_active(&identity)?;
    guard::require_owner_or_role(&identity, &[user_id], &[Role::Admin])?;

    let user = state
        .store
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(Json(UserResponse::from(user)))
}

/// `GET /api/users/{id}/public` — public profile info only.
pub async fn get_public_profile_handler(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<PublicUserResponse>> {
    let user = state
        .store
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(Json(PublicUserResponse::from(user)))
}

/// `GET /api/users/agents` — directory of active agents.
pub async fn list_agents_handler(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> AppResult<Json<Vec<PublicUserResponse>>> {
    let agents = state
        .store
        .list(IdentityFilter {
            role: Some(Role::Agent),
            active_only: true,
            offset: query.offset.unwrap_or(0),
            limit: query.limit,
        })
        .await?;

    Ok(Json(
        agents.into_iter().map(PublicUserResponse::from).collect(),
    ))
}

/// `PUT /api/users/me` — update the caller's profile.
pub async fn update_me_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(identity)): Extension<AuthenticatedUser>,
    Json(body): Json<UpdateProfileRequest>,
) -> AppResult<Json<UserResponse>> {
    let updated = state
        .store
        .update_profile(
            identity.id,
            ProfileUpdate {
                first_name: body.first_name,
                last_name: body.last_name,
                phone_number: body.phone_number,
            },
        )
        .await?;

    Ok(Json(UserResponse::from(updated)))
}

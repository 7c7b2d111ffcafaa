//! Authentication request handlers.

use axum::extract::State;
use axum::{Extension, Json};

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, MessageResponse, RegisterRequest,
    TokenResponse, UserResponse,
};
use crate::services::auth;

/// `POST /api/auth/token` — authenticate with username-or-email + password.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let resp = auth::login(&state, &body.username, &body.password).await?;
    Ok(Json(resp))
}

/// `POST /api/auth/register` — create a new user account.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<Json<UserResponse>> {
    let resp = auth::register(&state, body).await?;
    Ok(Json(resp))
}

/// `GET /api/auth/me` — current user information.
pub async fn me_handler(
    Extension(AuthenticatedUser(identity)): Extension<AuthenticatedUser>,
) -> Json<UserResponse> {
    Json(UserResponse::from(identity))
}

/// `POST /api/auth/change-password` — change the caller's password.
pub async fn change_password_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(identity)): Extension<AuthenticatedUser>,
    Json(body): Json<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    auth::change_password(&state, &identity, &body.current_password, &body.new_password).await?;
    Ok(Json(MessageResponse {
        message: "Password updated successfully".to_string(),
    }))
}

/// `POST /api/auth/refresh-token` — issue a fresh token for the caller.
pub async fn refresh_token_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(identity)): Extension<AuthenticatedUser>,
) -> AppResult<Json<TokenResponse>> {
    let resp = auth::refresh(&state, &identity)?;
    Ok(Json(resp))
}

/// `POST /api/auth/forgot-password` — trigger the reset flow.
///
/// The acknowledgment is identical whether or not the email is registered.
pub async fn forgot_password_handler(
    State(state): State<AppState>,
    Json(body): Json<ForgotPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    auth::request_reset(&state, &body.email).await?;
    Ok(Json(MessageResponse {
        message: auth::RESET_ACK.to_string(),
    }))
}

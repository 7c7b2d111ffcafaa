//! Authentication service — login/register/password flows delegating to
//! `hearth_core`.

use chrono::Utc;
use tracing::info;

use hearth_core::auth::{AuthError, guard, password, session};
use hearth_core::models::auth::{Identity, NewIdentity};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{RegisterRequest, TokenResponse, UserResponse};

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 8;

/// Acknowledgment returned for every reset request, match or not.
pub const RESET_ACK: &str =
    "If this email is registered, you will receive a password reset link.";

fn token_response(token: String) -> TokenResponse {
    TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
    }
}

/// Authenticate with username-or-email + password and issue a bearer token.
///
/// Disabled accounts are rejected after the credential check, with a
/// distinct error; unknown identifier and wrong password share one.
pub async fn login(state: &AppState, identifier: &str, password: &str) -> AppResult<TokenResponse> {
    let identity = session::authenticate(state.store.as_ref(), identifier, password).await?;
    guard::require_active(&identity)?;

    let token = state.codec.issue(&identity.username, Utc::now(), None)?;
    Ok(token_response(token))
}

/// Register a new account.
pub async fn register(state: &AppState, req: RegisterRequest) -> AppResult<UserResponse> {
    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let password_hash = password::hash_password(&req.password, state.config.bcrypt_cost)?;
    let identity = state
        .store
        .create(NewIdentity {
            username: req.username,
            email: req.email,
            password_hash,
            first_name: req.first_name,
            last_name: req.last_name,
            phone_number: req.phone_number,
            role: req.role,
        })
        .await?;

    info!(user_id = identity.id, role = %identity.role, "registered new user");
    Ok(UserResponse::from(identity))
}

/// Change the caller's password after re-verifying the current one.
pub async fn change_password(
    state: &AppState,
    identity: &Identity,
    current: &str,
    new: &str,
) -> AppResult<()> {
    if new.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    session::change_password(
        state.store.as_ref(),
        identity,
        current,
        new,
        state.config.bcrypt_cost,
    )
    .await
    .map_err(|e| match e {
        // A mismatch here is a validation failure on the form, not a login
        // rejection.
        AuthError::InvalidCredentials => {
            AppError::Validation("Incorrect current password".into())
        }
        other => AppError::from(other),
    })
}

/// Issue a fresh token for an already-resolved session. The previous token
/// stays valid until its own expiry.
pub fn refresh(state: &AppState, identity: &Identity) -> AppResult<TokenResponse> {
    let token = state.codec.issue(&identity.username, Utc::now(), None)?;
    Ok(token_response(token))
}

/// Trigger the reset flow. The response never varies with the lookup.
pub async fn request_reset(state: &AppState, email: &str) -> AppResult<()> {
    session::request_reset(
        state.store.as_ref(),
        state.notifier.as_ref(),
        email,
        Utc::now(),
    )
    .await?;
    Ok(())
}

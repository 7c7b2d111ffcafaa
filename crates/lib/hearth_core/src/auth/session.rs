//! Credential and session flows: authentication, token resolution,
//! password change, and reset requests.

use chrono::{DateTime, Utc};
use tracing::warn;

use super::{AuthError, password};
use crate::auth::token::TokenCodec;
use crate::models::auth::Identity;
use crate::store::{IdentityStore, ResetIntent, ResetNotifier};

/// Well-formed bcrypt digest (of an unused throwaway string) verified when a
/// lookup misses, so unknown identifiers cost a full bcrypt round just like
/// wrong passwords. Both paths collapse into one `InvalidCredentials`.
const DUMMY_DIGEST: &str = "$2b$12$R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW";

/// Authenticate by username-or-email and password.
///
/// The active flag is not checked here: callers reject disabled accounts
/// separately with [`AuthError::AccountDisabled`], which is deliberately
/// distinguishable (disabling is administration, not secrecy).
pub async fn authenticate(
    store: &dyn IdentityStore,
    identifier: &str,
    password_plaintext: &str,
) -> Result<Identity, AuthError> {
    let Some(identity) = store.find_by_username_or_email(identifier).await? else {
        password::verify_password(password_plaintext, DUMMY_DIGEST);
        return Err(AuthError::InvalidCredentials);
    };

    if !password::verify_password(password_plaintext, &identity.password_hash) {
        return Err(AuthError::InvalidCredentials);
    }

    Ok(identity)
}

/// Resolve a bearer token into its identity.
///
/// Verifies the token, reloads the identity by the token subject, and stamps
/// `last_login`. The stamp is best-effort: a failed write is logged and the
/// resolution still succeeds. A valid token whose account has since been
/// deleted yields [`AuthError::IdentityGone`].
pub async fn resolve(
    store: &dyn IdentityStore,
    codec: &TokenCodec,
    token: &str,
    now: DateTime<Utc>,
) -> Result<Identity, AuthError> {
    let claims = codec.verify(token, now)?;

    let mut identity = store
        .find_by_username_or_email(&claims.sub)
        .await?
        .ok_or(AuthError::IdentityGone)?;

    if let Err(e) = store.update_last_login(identity.id, now).await {
        warn!(user_id = identity.id, error = %e, "failed to stamp last_login");
    } else {
        identity.last_login = Some(now);
    }

    Ok(identity)
}

/// Change a password after re-verifying the current one.
///
/// The stored digest is re-read rather than trusted from the caller's
/// `Identity` snapshot, so a concurrent change cannot be clobbered through a
/// stale hash. Outstanding tokens remain valid until natural expiry.
pub async fn change_password(
    store: &dyn IdentityStore,
    identity: &Identity,
    current_plaintext: &str,
    new_plaintext: &str,
    cost: u32,
) -> Result<(), AuthError> {
    let stored = store
        .find_by_id(identity.id)
        .await?
        .ok_or(AuthError::IdentityGone)?;

    if !password::verify_password(current_plaintext, &stored.password_hash) {
        return Err(AuthError::InvalidCredentials);
    }

    let new_hash = password::hash_password(new_plaintext, cost)?;
    store.update_password_hash(identity.id, &new_hash).await?;
    Ok(())
}

/// Request a password reset for `email`.
///
/// Returns `Ok(())` whether or not the address is registered; the caller's
/// acknowledgment must not vary. On a match the notifier collaborator is
/// invoked fire-and-forget — its failures are logged, never propagated.
pub async fn request_reset(
    store: &dyn IdentityStore,
    notifier: &dyn ResetNotifier,
    email: &str,
    now: DateTime<Utc>,
) -> Result<(), AuthError> {
    if let Some(identity) = store.find_by_username_or_email(email).await? {
        let intent = ResetIntent {
            username: identity.username.clone(),
            requested_at: now,
        };
        if let Err(e) = notifier.notify(email, intent).await {
            warn!(user_id = identity.id, error = %e, "reset notification failed");
        }
    }
    Ok(())
}

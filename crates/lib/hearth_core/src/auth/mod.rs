//! Authentication and authorization logic.
//!
//! Provides password hashing, token issuance/verification, the credential
//! and session flows, and the guard predicates applied after resolution.

pub mod guard;
pub mod password;
pub mod session;
pub mod token;

use thiserror::Error;

use crate::store::StoreError;

/// Token verification failures. Each reason is distinct so callers can log
/// precisely, even when the HTTP layer collapses them into one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token signature mismatch")]
    BadSignature,

    #[error("malformed token")]
    Malformed,

    #[error("token expired")]
    Expired,
}

/// Authentication and authorization failures.
///
/// All variants are terminal, non-retryable outcomes. Unknown-identifier and
/// wrong-password both map to `InvalidCredentials`; the two cases are
/// intentionally indistinguishable to callers.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("account disabled")]
    AccountDisabled,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("identity no longer exists")]
    IdentityGone,

    #[error("insufficient permissions")]
    InsufficientPermissions,

    #[error("not authorized")]
    NotAuthorized,

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("internal error: {0}")]
    Internal(String),
}

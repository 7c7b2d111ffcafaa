//! Identity store and notification collaborator interfaces.
//!
//! The core reaches persistence only through [`IdentityStore`]; the data
//! layer owns the rows. Two adapters ship: [`postgres::PgIdentityStore`]
//! for production and [`memory::MemoryIdentityStore`] for tests and
//! ephemeral development setups.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::auth::{Identity, IdentityFilter, NewIdentity, ProfileUpdate};

/// Store adapter failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique-constraint violation on username or email.
    #[error("username or email already registered")]
    Duplicate,

    /// Row exists but cannot be mapped into a domain value.
    #[error("corrupt identity record: {0}")]
    Corrupt(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Adapter over the identity rows.
///
/// Username and email are each globally unique; `find_by_username_or_email`
/// matches either column, case-sensitively, as stored. Writes are single-row
/// and serialized by the storage layer.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_by_username_or_email(
        &self,
        identifier: &str,
    ) -> Result<Option<Identity>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Identity>, StoreError>;

    /// Insert a new identity, enforcing uniqueness ([`StoreError::Duplicate`]).
    async fn create(&self, new: NewIdentity) -> Result<Identity, StoreError>;

    async fn update_last_login(&self, id: i64, at: DateTime<Utc>) -> Result<(), StoreError>;

    /// Replace the stored password digest in a single atomic update.
    async fn update_password_hash(&self, id: i64, hash: &str) -> Result<(), StoreError>;

    /// Apply a partial profile update atomically, returning the new row.
    async fn update_profile(
        &self,
        id: i64,
        update: ProfileUpdate,
    ) -> Result<Identity, StoreError>;

    async fn list(&self, filter: IdentityFilter) -> Result<Vec<Identity>, StoreError>;
}

/// Notifier collaborator failures.
#[derive(Debug, Error)]
#[error("notification failed: {0}")]
pub struct NotifyError(pub String);

/// Password-reset intent handed to the notification collaborator.
///
/// No reset token or link exists in this design; the intent is the whole
/// payload and downstream delivery is a manual-process handoff.
#[derive(Debug, Clone)]
pub struct ResetIntent {
    pub username: String,
    pub requested_at: DateTime<Utc>,
}

/// Side-channel notification collaborator for reset requests.
/// Fire-and-forget: callers log failures and never propagate them.
#[async_trait]
pub trait ResetNotifier: Send + Sync {
    async fn notify(&self, email: &str, intent: ResetIntent) -> Result<(), NotifyError>;
}

/// Notifier that records reset intents in the application log.
///
/// Stands in for an email/SMS integration; deliberately the only delivery
/// mechanism shipped with the core.
#[derive(Debug, Default)]
pub struct LoggingResetNotifier;

#[async_trait]
impl ResetNotifier for LoggingResetNotifier {
    async fn notify(&self, email: &str, intent: ResetIntent) -> Result<(), NotifyError> {
        tracing::info!(
            email,
            username = %intent.username,
            requested_at = %intent.requested_at,
            "password reset requested"
        );
        Ok(())
    }
}

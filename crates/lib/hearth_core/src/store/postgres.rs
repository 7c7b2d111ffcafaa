//! PostgreSQL identity store adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{IdentityStore, StoreError};
use crate::models::auth::{Identity, IdentityFilter, NewIdentity, ProfileUpdate};

/// Columns selected for every identity row, with the role enum cast to text.
const IDENTITY_COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, \
     phone_number, role::text AS role, is_active, is_verified, created_at, updated_at, last_login";

/// Maximum page size for listings.
const MAX_PAGE_SIZE: i64 = 100;

/// Identity store backed by the `users` table.
#[derive(Clone)]
pub struct PgIdentityStore {
    pool: PgPool,
}

impl PgIdentityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Raw row shape; `role` arrives as text and is parsed into the enum.
#[derive(sqlx::FromRow)]
struct IdentityRow {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    first_name: Option<String>,
    last_name: Option<String>,
    phone_number: Option<String>,
    role: String,
    is_active: bool,
    is_verified: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    last_login: Option<DateTime<Utc>>,
}

impl TryFrom<IdentityRow> for Identity {
    type Error = StoreError;

    fn try_from(row: IdentityRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse()
            .map_err(|e| StoreError::Corrupt(format!("user {}: {e}", row.id)))?;
        Ok(Identity {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            first_name: row.first_name,
            last_name: row.last_name,
            phone_number: row.phone_number,
            role,
            is_active: row.is_active,
            is_verified: row.is_verified,
            created_at: row.created_at,
            updated_at: row.updated_at,
            last_login: row.last_login,
        })
    }
}

fn map_insert_error(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Duplicate,
        _ => StoreError::Database(e),
    }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn find_by_username_or_email(
        &self,
        identifier: &str,
    ) -> Result<Option<Identity>, StoreError> {
        let sql =
            format!("SELECT {IDENTITY_COLUMNS} FROM users WHERE username = $1 OR email = $1");
        let row = sqlx::query_as::<_, IdentityRow>(&sql)
            .bind(identifier)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Identity::try_from).transpose()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Identity>, StoreError> {
        let sql = format!("SELECT {IDENTITY_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, IdentityRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Identity::try_from).transpose()
    }

    async fn create(&self, new: NewIdentity) -> Result<Identity, StoreError> {
        let sql = format!(
            "INSERT INTO users (username, email, password_hash, first_name, last_name, \
             phone_number, role) \
             VALUES ($1, $2, $3, $4, $5, $6, $7::user_role) \
             RETURNING {IDENTITY_COLUMNS}"
        );
        let row = sqlx::query_as::<_, IdentityRow>(&sql)
            .bind(&new.username)
            .bind(&new.email)
            .bind(&new.password_hash)
            .bind(&new.first_name)
            .bind(&new.last_name)
            .bind(&new.phone_number)
            .bind(new.role.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(map_insert_error)?;
        row.try_into()
    }

    async fn update_last_login(&self, id: i64, at: DateTime<Utc>) -> Result<(), StoreError> {
        sqlx::query("UPDATE users SET last_login = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_password_hash(&self, id: i64, hash: &str) -> Result<(), StoreError> {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(hash)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_profile(
        &self,
        id: i64,
        update: ProfileUpdate,
    ) -> Result<Identity, StoreError> {
        let sql = format!(
            "UPDATE users SET \
             first_name = COALESCE($2, first_name), \
             last_name = COALESCE($3, last_name), \
             phone_number = COALESCE($4, phone_number), \
             updated_at = now() \
             WHERE id = $1 \
             RETURNING {IDENTITY_COLUMNS}"
        );
        let row = sqlx::query_as::<_, IdentityRow>(&sql)
            .bind(id)
            .bind(&update.first_name)
            .bind(&update.last_name)
            .bind(&update.phone_number)
            .fetch_one(&self.pool)
            .await?;
        row.try_into()
    }

    async fn list(&self, filter: IdentityFilter) -> Result<Vec<Identity>, StoreError> {
        let limit = filter.limit.unwrap_or(MAX_PAGE_SIZE).min(MAX_PAGE_SIZE);
        let sql = format!(
            "SELECT {IDENTITY_COLUMNS} FROM users \
             WHERE ($1::user_role IS NULL OR role = $1::user_role) \
               AND (NOT $2 OR is_active) \
             ORDER BY id \
             OFFSET $3 LIMIT $4"
        );
        let rows = sqlx::query_as::<_, IdentityRow>(&sql)
            .bind(filter.role.map(|r| r.as_str()))
            .bind(filter.active_only)
            .bind(filter.offset.max(0))
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Identity::try_from).collect()
    }
}

//! In-memory identity store for tests and ephemeral development setups.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{IdentityStore, StoreError};
use crate::models::auth::{Identity, IdentityFilter, NewIdentity, ProfileUpdate};

#[derive(Default)]
struct Inner {
    users: BTreeMap<i64, Identity>,
    next_id: i64,
}

/// Map-backed [`IdentityStore`] with the same uniqueness semantics as the
/// PostgreSQL adapter.
#[derive(Default)]
pub struct MemoryIdentityStore {
    inner: Mutex<Inner>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the active flag directly, standing in for the administrative
    /// action that lives outside the core.
    pub fn set_active(&self, id: i64, active: bool) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(user) = inner.users.get_mut(&id) {
            user.is_active = active;
            user.updated_at = Utc::now();
        }
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn find_by_username_or_email(
        &self,
        identifier: &str,
    ) -> Result<Option<Identity>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .users
            .values()
            .find(|u| u.username == identifier || u.email == identifier)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Identity>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.get(&id).cloned())
    }

    async fn create(&self, new: NewIdentity) -> Result<Identity, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let taken = inner
            .users
            .values()
            .any(|u| u.username == new.username || u.email == new.email);
        if taken {
            return Err(StoreError::Duplicate);
        }

        inner.next_id += 1;
        let now = Utc::now();
        let identity = Identity {
            id: inner.next_id,
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            first_name: new.first_name,
            last_name: new.last_name,
            phone_number: new.phone_number,
            role: new.role,
            is_active: true,
            is_verified: false,
            created_at: now,
            updated_at: now,
            last_login: None,
        };
        inner.users.insert(identity.id, identity.clone());
        Ok(identity)
    }

    async fn update_last_login(&self, id: i64, at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(user) = inner.users.get_mut(&id) {
            user.last_login = Some(at);
        }
        Ok(())
    }

    async fn update_password_hash(&self, id: i64, hash: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.users.get_mut(&id) {
            Some(user) => {
                user.password_hash = hash.to_string();
                user.updated_at = Utc::now();
                Ok(())
            }
            None => Err(StoreError::Database(sqlx::Error::RowNotFound)),
        }
    }

    async fn update_profile(
        &self,
        id: i64,
        update: ProfileUpdate,
    ) -> Result<Identity, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.users.get_mut(&id) {
            Some(user) => {
                if let Some(first_name) = update.first_name {
                    user.first_name = Some(first_name);
                }
                if let Some(last_name) = update.last_name {
                    user.last_name = Some(last_name);
                }
                if let Some(phone_number) = update.phone_number {
                    user.phone_number = Some(phone_number);
                }
                user.updated_at = Utc::now();
                Ok(user.clone())
            }
            None => Err(StoreError::Database(sqlx::Error::RowNotFound)),
        }
    }

    async fn list(&self, filter: IdentityFilter) -> Result<Vec<Identity>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let limit = filter.limit.unwrap_or(i64::MAX).max(0) as usize;
        Ok(inner
            .users
            .values()
            .filter(|u| filter.role.is_none_or(|r| u.role == r))
            .filter(|u| !filter.active_only || u.is_active)
            .skip(filter.offset.max(0) as usize)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::Role;

    fn new_identity(username: &str, email: &str, role: Role) -> NewIdentity {
        NewIdentity {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "digest".to_string(),
            first_name: None,
            last_name: None,
            phone_number: None,
            role,
        }
    }

    #[tokio::test]
    async fn create_assigns_sequential_ids() {
        let store = MemoryIdentityStore::new();
        let a = store
            .create(new_identity("alice", "alice@example.com", Role::Client))
            .await
            .unwrap();
        let b = store
            .create(new_identity("bob", "bob@example.com", Role::Agent))
            .await
            .unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn duplicate_username_or_email_is_rejected() {
        let store = MemoryIdentityStore::new();
        store
            .create(new_identity("alice", "alice@example.com", Role::Client))
            .await
            .unwrap();

        let same_name = store
            .create(new_identity("alice", "other@example.com", Role::Client))
            .await;
        assert!(matches!(same_name, Err(StoreError::Duplicate)));

        let same_email = store
            .create(new_identity("other", "alice@example.com", Role::Client))
            .await;
        assert!(matches!(same_email, Err(StoreError::Duplicate)));
    }

    #[tokio::test]
    async fn lookup_matches_username_and_email() {
        let store = MemoryIdentityStore::new();
        store
            .create(new_identity("alice", "alice@example.com", Role::Client))
            .await
            .unwrap();

        let by_name = store.find_by_username_or_email("alice").await.unwrap();
        let by_email = store
            .find_by_username_or_email("alice@example.com")
            .await
            .unwrap();
        assert_eq!(by_name.unwrap().id, by_email.unwrap().id);

        // Case-sensitive, as stored.
        assert!(
            store
                .find_by_username_or_email("Alice")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn list_filters_by_role_and_active() {
        let store = MemoryIdentityStore::new();
        store
            .create(new_identity("alice", "alice@example.com", Role::Agent))
            .await
            .unwrap();
        store
            .create(new_identity("bob", "bob@example.com", Role::Client))
            .await
            .unwrap();

        let agents = store
            .list(IdentityFilter {
                role: Some(Role::Agent),
                active_only: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(agents.len(), 1);
        assert_eq!(agents[0].username, "alice");
    }

    #[tokio::test]
    async fn update_profile_touches_only_provided_fields() {
        let store = MemoryIdentityStore::new();
        let created = store
            .create(NewIdentity {
                first_name: Some("Alice".to_string()),
                ..new_identity("alice", "alice@example.com", Role::Client)
            })
            .await
            .unwrap();

        let updated = store
            .update_profile(
                created.id,
                ProfileUpdate {
                    phone_number: Some("555-0100".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.first_name.as_deref(), Some("Alice"));
        assert_eq!(updated.phone_number.as_deref(), Some("555-0100"));
        assert!(updated.updated_at >= created.updated_at);
    }
}

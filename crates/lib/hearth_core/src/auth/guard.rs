//! Authorization guard predicates.
//!
//! Pure checks applied after a successful resolve. Each predicate always
//! terminates with a decision and never touches storage; ownership sets are
//! supplied by the caller per request, so the core stays ignorant of what a
//! property or measurement is. Compose per endpoint by `?`-chaining.

use super::AuthError;
use crate::models::auth::{Identity, Role};

/// Reject identities whose account has been disabled.
pub fn require_active(identity: &Identity) -> Result<(), AuthError> {
    if !identity.is_active {
        return Err(AuthError::AccountDisabled);
    }
    Ok(())
}

/// Reject identities whose role is outside `allowed`.
pub fn require_role(identity: &Identity, allowed: &[Role]) -> Result<(), AuthError> {
    if !allowed.contains(&identity.role) {
        return Err(AuthError::InsufficientPermissions);
    }
    Ok(())
}

/// Allow owners of the resource and holders of an allowed role; reject
/// everyone else.
///
/// `owner_ids` is whatever the caller considers owning identities for this
/// request — e.g. a property's owner plus its assigned agent.
pub fn require_owner_or_role(
    identity: &Identity,
    owner_ids: &[i64],
    allowed: &[Role],
) -> Result<(), AuthError> {
    if owner_ids.contains(&identity.id) || allowed.contains(&identity.role) {
        return Ok(());
    }
    Err(AuthError::NotAuthorized)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn identity(id: i64, role: Role, active: bool) -> Identity {
        let now = Utc::now();
        Identity {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@example.com"),
            password_hash: "digest".to_string(),
            first_name: None,
            last_name: None,
            phone_number: None,
            role,
            is_active: active,
            is_verified: true,
            created_at: now,
            updated_at: now,
            last_login: None,
        }
    }

    #[test]
    fn require_active_rejects_disabled_accounts() {
        assert!(require_active(&identity(1, Role::Client, true)).is_ok());
        let err = require_active(&identity(1, Role::Client, false)).unwrap_err();
        assert!(matches!(err, AuthError::AccountDisabled));
    }

    #[test]
    fn require_role_checks_membership() {
        let admin = identity(1, Role::Admin, true);
        let client = identity(2, Role::Client, true);

        assert!(require_role(&admin, &[Role::Admin]).is_ok());
        let err = require_role(&client, &[Role::Admin]).unwrap_err();
        assert!(matches!(err, AuthError::InsufficientPermissions));

        // Agent-or-admin, the common staff check.
        let agent = identity(3, Role::Agent, true);
        assert!(require_role(&agent, &[Role::Agent, Role::Admin]).is_ok());
        assert!(require_role(&admin, &[Role::Agent, Role::Admin]).is_ok());
        assert!(require_role(&client, &[Role::Agent, Role::Admin]).is_err());
    }

    #[test]
    fn owner_passes_regardless_of_role() {
        let owner = identity(7, Role::Client, true);
        assert!(require_owner_or_role(&owner, &[7], &[Role::Admin]).is_ok());
    }

    #[test]
    fn non_owner_needs_an_allowed_role() {
        let stranger = identity(8, Role::Client, true);
        let err = require_owner_or_role(&stranger, &[7], &[Role::Admin]).unwrap_err();
        assert!(matches!(err, AuthError::NotAuthorized));

        let admin = identity(8, Role::Admin, true);
        assert!(require_owner_or_role(&admin, &[7], &[Role::Admin]).is_ok());
    }

    #[test]
    fn multiple_owner_ids_cover_owner_and_assigned_agent() {
        let assigned_agent = identity(12, Role::Agent, true);
        assert!(require_owner_or_role(&assigned_agent, &[7, 12], &[Role::Admin]).is_ok());

        let other_agent = identity(13, Role::Agent, true);
        assert!(require_owner_or_role(&other_agent, &[7, 12], &[Role::Admin]).is_err());
    }

    #[test]
    fn empty_owner_set_degenerates_to_role_check() {
        let admin = identity(1, Role::Admin, true);
        let client = identity(2, Role::Client, true);
        assert!(require_owner_or_role(&admin, &[], &[Role::Admin]).is_ok());
        assert!(require_owner_or_role(&client, &[], &[Role::Admin]).is_err());
    }
}

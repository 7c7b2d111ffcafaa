//! Password hashing via bcrypt.

use super::AuthError;

/// Default bcrypt cost factor.
pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

/// Hash a password with bcrypt at the given cost.
///
/// bcrypt salts internally: hashing the same plaintext twice yields two
/// different digests, both of which verify.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    bcrypt::hash(password, cost).map_err(|e| AuthError::Internal(format!("bcrypt hash: {e}")))
}

/// Verify a password against a bcrypt digest.
///
/// A malformed digest is a verification failure, not an error: this is on
/// the login path, and the caller must get the same `false` it would get
/// for a wrong password.
pub fn verify_password(password: &str, digest: &str) -> bool {
    bcrypt::verify(password, digest).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[test]
    fn same_plaintext_hashes_differently_but_both_verify() {
        let a = hash_password("hunter2", TEST_COST).unwrap();
        let b = hash_password("hunter2", TEST_COST).unwrap();
        assert_ne!(a, b);
        assert!(verify_password("hunter2", &a));
        assert!(verify_password("hunter2", &b));
    }

    #[test]
    fn wrong_password_fails_verification() {
        let digest = hash_password("hunter2", TEST_COST).unwrap();
        assert!(!verify_password("hunter3", &digest));
        assert!(!verify_password("", &digest));
    }

    #[test]
    fn malformed_digest_fails_instead_of_erroring() {
        assert!(!verify_password("hunter2", "not-a-bcrypt-digest"));
        assert!(!verify_password("hunter2", ""));
        assert!(!verify_password("hunter2", "$2b$12$truncated"));
    }
}

//! Bearer-token issuance and verification.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use super::{AuthError, TokenError};
use crate::models::auth::TokenClaims;

/// Default access-token lifetime: 30 minutes.
pub const DEFAULT_TTL_MINUTES: i64 = 30;

/// Signs and verifies compact stateless bearer tokens.
///
/// The signing secret and algorithm are process-wide configuration injected
/// once at construction. Rotating the secret invalidates every outstanding
/// token; there is no migration path by design.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    algorithm: Algorithm,
    default_ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: &[u8], algorithm: Algorithm, default_ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            algorithm,
            default_ttl,
        }
    }

    /// Convenience constructor: HS256 with the default 30-minute lifetime.
    pub fn hs256(secret: &[u8]) -> Self {
        Self::new(
            secret,
            Algorithm::HS256,
            Duration::minutes(DEFAULT_TTL_MINUTES),
        )
    }

    /// Issue a signed token for `subject`, expiring at `now + ttl`.
    ///
    /// Issuance is independent per call: a fresh token never invalidates
    /// previously issued ones.
    pub fn issue(
        &self,
        subject: &str,
        now: DateTime<Utc>,
        ttl: Option<Duration>,
    ) -> Result<String, AuthError> {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let claims = TokenClaims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        encode(&Header::new(self.algorithm), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("jwt encode: {e}")))
    }

    /// Verify a token: signature integrity first, then `now < exp`.
    ///
    /// Expiry is checked against the caller-supplied `now`, not the process
    /// clock, so the library's own expiry validation is disabled and the
    /// comparison happens here.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;

        let data =
            decode::<TokenClaims>(token, &self.decoding, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::InvalidSignature => TokenError::BadSignature,
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Malformed,
                }
            })?;

        if now.timestamp() >= data.claims.exp {
            return Err(TokenError::Expired);
        }
        Ok(data.claims)
    }
}

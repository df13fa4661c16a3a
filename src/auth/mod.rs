//! Token issuance and validation.
//!
//! Tokens are self-contained HS256 JWTs carrying `{sub, role, exp}`.
//! The embedded role is a snapshot taken at issuance: a later role
//! change does not invalidate or rewrite already-issued tokens, which
//! keep their old role until expiry.
//!
//! Verification is all-or-nothing: no claim is read before the
//! signature and structure have been checked.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::errors::CatalogError;

/// Closed role enumeration; the only comparison anywhere is strict
/// equality via [`Identity::require_role`]. There is no hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded, verified token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id this token represents, as a string.
    pub sub: String,

    /// Role captured at issuance time.
    pub role: String,

    /// Expiration timestamp (Unix epoch seconds).
    pub exp: i64,
}

/// An authenticated caller, resolved from a validated token.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: i64,
    pub role: Role,
}

impl Identity {
    /// The single authorization predicate: strict role equality.
    pub fn require_role(&self, required: Role) -> Result<(), CatalogError> {
        if self.role != required {
            return Err(CatalogError::Forbidden(format!(
                "Not enough privileges. Required role: {}",
                required
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Signature failure, malformed structure, or missing claims.
    #[error("Invalid token: {0}")]
    Invalid(String),

    /// Structurally valid and correctly signed, but past expiry.
    #[error("Token has expired")]
    Expired,
}

/// Issue a signed access token for a user.
///
/// `ttl` defaults to the process-wide configured lifetime when `None`.
pub fn issue_token(
    secret: &str,
    subject: i64,
    role: Role,
    ttl: Option<Duration>,
    default_ttl_minutes: i64,
) -> Result<String, CatalogError> {
    let ttl = ttl.unwrap_or_else(|| Duration::minutes(default_ttl_minutes));
    let expire = Utc::now() + ttl;

    let claims = Claims {
        sub: subject.to_string(),
        role: role.as_str().to_string(),
        exp: expire.timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        tracing::error!(target: "catalog.auth", error = %e, "Failed to sign access token");
        CatalogError::Internal
    })
}

/// Validate a token and return its claims.
///
/// Expiry is reported distinctly from signature/structure failures so
/// callers can tell a stale session from a forged or mangled token.
pub fn validate_token(secret: &str, token: &str) -> Result<Claims, TokenError> {
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid(e.to_string()),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";
    const DEFAULT_TTL_MINUTES: i64 = 60 * 24;

    #[test]
    fn test_role_parsing() {
        assert_eq!(Role::from_str("admin").ok(), Some(Role::Admin));
        assert_eq!(Role::from_str("user").ok(), Some(Role::User));
        assert!(Role::from_str("superadmin").is_err());
        assert!(Role::from_str("Admin").is_err());
    }

    #[test]
    fn test_require_role_exact_match_only() {
        let admin = Identity {
            id: 1,
            role: Role::Admin,
        };
        let user = Identity {
            id: 2,
            role: Role::User,
        };

        assert!(admin.require_role(Role::Admin).is_ok());
        assert!(user.require_role(Role::User).is_ok());

        // Strict equality: admin does not implicitly satisfy user.
        assert!(matches!(
            admin.require_role(Role::User),
            Err(CatalogError::Forbidden(_))
        ));
        assert!(matches!(
            user.require_role(Role::Admin),
            Err(CatalogError::Forbidden(_))
        ));
    }

    #[test]
    fn test_issue_and_validate_roundtrip() {
        let token = issue_token(SECRET, 42, Role::User, None, DEFAULT_TTL_MINUTES).unwrap();
        let claims = validate_token(SECRET, &token).unwrap();

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.role, "user");
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_issued_role_is_a_snapshot() {
        let token = issue_token(SECRET, 7, Role::Admin, None, DEFAULT_TTL_MINUTES).unwrap();
        let claims = validate_token(SECRET, &token).unwrap();
        assert_eq!(claims.role, "admin");
    }

    #[test]
    fn test_custom_ttl_sets_expiry() {
        let token = issue_token(
            SECRET,
            1,
            Role::User,
            Some(Duration::minutes(5)),
            DEFAULT_TTL_MINUTES,
        )
        .unwrap();
        let claims = validate_token(SECRET, &token).unwrap();

        let expected = (Utc::now() + Duration::minutes(5)).timestamp();
        assert!((claims.exp - expected).abs() <= 2);
    }

    #[test]
    fn test_expired_token_distinguishable_from_bad_signature() {
        // Sign an already-expired token directly (2 hours past expiry,
        // well beyond the default 60s leeway).
        let stale = Claims {
            sub: "9".to_string(),
            role: "user".to_string(),
            exp: (Utc::now() - Duration::hours(2)).timestamp(),
        };
        let expired_token = encode(
            &Header::new(Algorithm::HS256),
            &stale,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(
            validate_token(SECRET, &expired_token),
            Err(TokenError::Expired)
        );

        // Wrong key: same token, different failure class.
        let forged = issue_token(
            "another-secret-another-secret-xx",
            9,
            Role::User,
            None,
            DEFAULT_TTL_MINUTES,
        )
        .unwrap();
        assert!(matches!(
            validate_token(SECRET, &forged),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(matches!(
            validate_token(SECRET, "not-a-jwt"),
            Err(TokenError::Invalid(_))
        ));
        assert!(matches!(
            validate_token(SECRET, ""),
            Err(TokenError::Invalid(_))
        ));
    }
}

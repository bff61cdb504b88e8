use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use policydesk_core::UserId;

use crate::Role;

/// Claims embedded in a bearer credential (transport-agnostic).
///
/// These are *advisory*: the client reads them to gate UI and to detect
/// expiry without a round trip, but the backend re-validates the credential
/// on every request and remains the source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — the username the credential was issued to.
    pub sub: String,

    /// Expiration, seconds since the Unix epoch.
    pub exp: i64,

    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,

    /// Role name as issued. Kept raw so an unrecognized role never makes
    /// the whole credential undecodable; parse via [`Claims::role`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Numeric account id, when the backend includes it.
    #[serde(
        default,
        rename = "userId",
        alias = "user_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_id: Option<UserId>,
}

impl Claims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp(self.exp, 0)
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp(self.iat, 0)
    }

    /// Whether the credential has expired as of `now`.
    ///
    /// An `exp` that does not map to a representable timestamp counts as
    /// expired (fail-closed).
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at() {
            Some(expires_at) => now >= expires_at,
            None => true,
        }
    }

    /// The issued role, parsed fail-closed: an unknown role name yields
    /// `None` and must be treated as "no sections visible".
    pub fn role(&self) -> Option<Role> {
        self.role.as_deref().and_then(|r| r.parse().ok())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,
}

/// Deterministically validate a credential's time window.
///
/// Note: this validates the *claims* only. The client never verifies
/// signatures; that is the backend's job.
pub fn validate_claims(claims: &Claims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.exp <= claims.iat {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if claims
        .issued_at()
        .is_some_and(|issued_at| now < issued_at)
    {
        return Err(TokenValidationError::NotYetValid);
    }
    if claims.is_expired(now) {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

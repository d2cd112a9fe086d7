//! Revoked refresh token (blacklist entry) domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Append-only blacklist entry for a revoked refresh token, keyed by the
/// token's `jti` claim. Entries past `expires_at` are garbage only — the
/// token could no longer verify anyway — and may be cleaned up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevokedToken {
    pub id: Uuid,
    /// The `jti` claim of the revoked token.
    pub jti: String,
    pub user_id: Uuid,
    /// Expiry of the revoked token itself.
    pub expires_at: DateTime<Utc>,
    pub revoked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRevokedToken {
    pub jti: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

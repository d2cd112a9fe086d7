//! SurrealDB implementation of [`RevokedTokenRepository`].
//!
//! The blacklist is append-only; re-revoking a jti returns the existing
//! entry.

use chrono::{DateTime, Utc};
use rentora_core::error::RentoraResult;
use rentora_core::models::revoked_token::{CreateRevokedToken, RevokedToken};
use rentora_core::repository::RevokedTokenRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{CountRow, parse_uuid};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct RevokedTokenRowWithId {
    record_id: String,
    jti: String,
    user_id: String,
    expires_at: DateTime<Utc>,
    revoked_at: DateTime<Utc>,
}

impl RevokedTokenRowWithId {
    fn try_into_revoked(self) -> Result<RevokedToken, DbError> {
        let id = parse_uuid(&self.record_id, "revoked_token")?;
        Ok(RevokedToken {
            id,
            jti: self.jti,
            user_id: parse_uuid(&self.user_id, "user")?,
            expires_at: self.expires_at,
            revoked_at: self.revoked_at,
        })
    }
}

/// SurrealDB implementation of the RevokedToken repository.
#[derive(Clone)]
pub struct SurrealRevokedTokenRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealRevokedTokenRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> RevokedTokenRepository for SurrealRevokedTokenRepository<C> {
    async fn revoke(&self, input: CreateRevokedToken) -> RentoraResult<RevokedToken> {
        let id_str = Uuid::new_v4().to_string();

        // Create-if-absent in one transaction; re-revoking a jti returns
        // the existing entry instead of tripping the unique index.
        let mut result = self
            .db
            .query(
                "BEGIN TRANSACTION;
                 LET $existing = (SELECT id FROM revoked_token \
                     WHERE jti = $jti LIMIT 1);
                 IF array::len($existing) = 0 {
                     CREATE type::record('revoked_token', $id) SET \
                         jti = $jti, \
                         user_id = $user_id, \
                         expires_at = $expires_at;
                 };
                 SELECT meta::id(id) AS record_id, * FROM revoked_token \
                     WHERE jti = $jti LIMIT 1;
                 COMMIT TRANSACTION;",
            )
            .bind(("id", id_str.clone()))
            .bind(("jti", input.jti))
            .bind(("user_id", input.user_id.to_string()))
            .bind(("expires_at", input.expires_at))
            .await
            .map_err(DbError::from)?;

        // The final SELECT is the second-to-last statement; BEGIN and
        // COMMIT each occupy a result slot in the response.
        let statements = result.num_statements();
        let rows: Vec<RevokedTokenRowWithId> = result
            .take(statements.saturating_sub(2))
            .map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "revoked_token".into(),
            id: id_str,
        })?;

        Ok(row.try_into_revoked()?)
    }

    async fn is_revoked(&self, jti: &str) -> RentoraResult<bool> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM revoked_token \
                 WHERE jti = $jti GROUP ALL",
            )
            .bind(("jti", jti.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0) > 0)
    }

    async fn cleanup_expired(&self) -> RentoraResult<u64> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM revoked_token \
                 WHERE expires_at < time::now() GROUP ALL",
            )
            .await
            .map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        let expired = rows.first().map(|r| r.total).unwrap_or(0);

        if expired > 0 {
            self.db
                .query("DELETE revoked_token WHERE expires_at < time::now()")
                .await
                .map_err(DbError::from)?;
        }

        Ok(expired)
    }
}

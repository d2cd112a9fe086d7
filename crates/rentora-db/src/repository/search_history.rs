//! SurrealDB implementation of [`SearchHistoryRepository`].
//!
//! `record` is an increment-or-create keyed by (user, keyword), run as a
//! single transaction; the unique index on those columns is a backstop.

use chrono::{DateTime, Utc};
use rentora_core::error::RentoraResult;
use rentora_core::models::search_history::{PopularSearch, SearchHistory};
use rentora_core::repository::SearchHistoryRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::parse_uuid;
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct SearchHistoryRowWithId {
    record_id: String,
    user_id: Option<String>,
    keyword: String,
    search_count: u64,
    created_at: DateTime<Utc>,
}

impl SearchHistoryRowWithId {
    fn try_into_history(self) -> Result<SearchHistory, DbError> {
        let id = parse_uuid(&self.record_id, "search_history")?;
        let user_id = self
            .user_id
            .as_deref()
            .map(|s| parse_uuid(s, "user"))
            .transpose()?;
        Ok(SearchHistory {
            id,
            user_id,
            keyword: self.keyword,
            search_count: self.search_count,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct PopularRow {
    keyword: String,
    total: u64,
}

/// SurrealDB implementation of the SearchHistory repository.
#[derive(Clone)]
pub struct SurrealSearchHistoryRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealSearchHistoryRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> SearchHistoryRepository for SurrealSearchHistoryRepository<C> {
    async fn record(&self, user_id: Option<Uuid>, keyword: &str) -> RentoraResult<SearchHistory> {
        let id_str = Uuid::new_v4().to_string();

        // Increment-or-create in one transaction so concurrent searches
        // for the same (user, keyword) never race the unique index.
        let mut result = self
            .db
            .query(
                "BEGIN TRANSACTION;
                 LET $existing = (SELECT id FROM search_history \
                     WHERE user_id = $user_id AND keyword = $keyword LIMIT 1);
                 IF array::len($existing) > 0 {
                     UPDATE search_history SET search_count += 1 \
                         WHERE user_id = $user_id AND keyword = $keyword;
                 } ELSE {
                     CREATE type::record('search_history', $id) SET \
                         user_id = $user_id, \
                         keyword = $keyword, \
                         search_count = 1;
                 };
                 SELECT meta::id(id) AS record_id, * FROM search_history \
                     WHERE user_id = $user_id AND keyword = $keyword LIMIT 1;
                 COMMIT TRANSACTION;",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", user_id.map(|u| u.to_string())))
            .bind(("keyword", keyword.to_string()))
            .await
            .map_err(DbError::from)?;

        // The final SELECT is the second-to-last statement; BEGIN and
        // COMMIT each occupy a result slot in the response.
        let statements = result.num_statements();
        let rows: Vec<SearchHistoryRowWithId> = result
            .take(statements.saturating_sub(2))
            .map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "search_history".into(),
            id: id_str,
        })?;

        Ok(row.try_into_history()?)
    }

    async fn popular(&self, limit: u64) -> RentoraResult<Vec<PopularSearch>> {
        let mut result = self
            .db
            .query(
                "SELECT keyword, math::sum(search_count) AS total \
                 FROM search_history \
                 GROUP BY keyword \
                 ORDER BY total DESC \
                 LIMIT $limit",
            )
            .bind(("limit", limit))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PopularRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(|r| PopularSearch {
                keyword: r.keyword,
                total: r.total,
            })
            .collect())
    }

    async fn list_by_user(&self, user_id: Uuid, limit: u64) -> RentoraResult<Vec<SearchHistory>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM search_history \
                 WHERE user_id = $user_id \
                 ORDER BY created_at DESC \
                 LIMIT $limit",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("limit", limit))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SearchHistoryRowWithId> = result.take(0).map_err(DbError::from)?;
        rows.into_iter()
            .map(|row| Ok(row.try_into_history()?))
            .collect()
    }
}

//! SurrealDB implementation of [`ReviewRepository`].
//!
//! The unique (tenant_id, listing_id) index backs up the service-level
//! duplicate check.

use chrono::{DateTime, Utc};
use rentora_core::error::RentoraResult;
use rentora_core::models::review::{CreateReview, Review};
use rentora_core::repository::{PaginatedResult, Pagination, ReviewRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{CountRow, parse_uuid};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ReviewRow {
    listing_id: String,
    tenant_id: String,
    rating: u8,
    comment: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct ReviewRowWithId {
    record_id: String,
    listing_id: String,
    tenant_id: String,
    rating: u8,
    comment: Option<String>,
    created_at: DateTime<Utc>,
}

impl ReviewRow {
    fn into_review(self, id: Uuid) -> Result<Review, DbError> {
        Ok(Review {
            id,
            listing_id: parse_uuid(&self.listing_id, "listing")?,
            tenant_id: parse_uuid(&self.tenant_id, "tenant")?,
            rating: self.rating,
            comment: self.comment,
            created_at: self.created_at,
        })
    }
}

impl ReviewRowWithId {
    fn try_into_review(self) -> Result<Review, DbError> {
        let id = parse_uuid(&self.record_id, "review")?;
        Ok(Review {
            id,
            listing_id: parse_uuid(&self.listing_id, "listing")?,
            tenant_id: parse_uuid(&self.tenant_id, "tenant")?,
            rating: self.rating,
            comment: self.comment,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the Review repository.
#[derive(Clone)]
pub struct SurrealReviewRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealReviewRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ReviewRepository for SurrealReviewRepository<C> {
    async fn create(&self, input: CreateReview) -> RentoraResult<Review> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('review', $id) SET \
                 listing_id = $listing_id, \
                 tenant_id = $tenant_id, \
                 rating = $rating, \
                 comment = $comment",
            )
            .bind(("id", id_str.clone()))
            .bind(("listing_id", input.listing_id.to_string()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("rating", input.rating))
            .bind(("comment", input.comment))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::Data(e.to_string()))?;

        let rows: Vec<ReviewRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "review".into(),
            id: id_str,
        })?;

        Ok(row.into_review(id)?)
    }

    async fn exists_for(&self, tenant_id: Uuid, listing_id: Uuid) -> RentoraResult<bool> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM review \
                 WHERE tenant_id = $tenant_id \
                 AND listing_id = $listing_id GROUP ALL",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("listing_id", listing_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0) > 0)
    }

    async fn list_by_listing(
        &self,
        listing_id: Uuid,
        pagination: Pagination,
    ) -> RentoraResult<PaginatedResult<Review>> {
        let listing_id_str = listing_id.to_string();

        let total = self.count_by_listing(listing_id).await?;

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM review \
                 WHERE listing_id = $listing_id \
                 ORDER BY created_at DESC \
                 LIMIT $limit START $offset",
            )
            .bind(("listing_id", listing_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ReviewRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_review())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn count_by_listing(&self, listing_id: Uuid) -> RentoraResult<u64> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM review \
                 WHERE listing_id = $listing_id GROUP ALL",
            )
            .bind(("listing_id", listing_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}

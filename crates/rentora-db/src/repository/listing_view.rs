//! SurrealDB implementation of [`ListingViewRepository`].

use chrono::{DateTime, Utc};
use rentora_core::error::RentoraResult;
use rentora_core::models::listing_view::ListingView;
use rentora_core::repository::ListingViewRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::parse_uuid;
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ListingViewRowWithId {
    record_id: String,
    listing_id: String,
    user_id: Option<String>,
    ip_address: Option<String>,
    view_count: u64,
    created_at: DateTime<Utc>,
}

impl ListingViewRowWithId {
    fn try_into_view(self) -> Result<ListingView, DbError> {
        let id = parse_uuid(&self.record_id, "listing_view")?;
        let user_id = self
            .user_id
            .as_deref()
            .map(|s| parse_uuid(s, "user"))
            .transpose()?;
        Ok(ListingView {
            id,
            listing_id: parse_uuid(&self.listing_id, "listing")?,
            user_id,
            ip_address: self.ip_address,
            view_count: self.view_count,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct SumRow {
    total: Option<u64>,
}

/// SurrealDB implementation of the ListingView repository.
#[derive(Clone)]
pub struct SurrealListingViewRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealListingViewRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ListingViewRepository for SurrealListingViewRepository<C> {
    async fn record(
        &self,
        listing_id: Uuid,
        user_id: Option<Uuid>,
        ip_address: Option<&str>,
    ) -> RentoraResult<ListingView> {
        let id_str = Uuid::new_v4().to_string();

        // Increment-or-create keyed by (listing, user?, ip?) in one
        // transaction so concurrent views never race the unique index.
        let mut result = self
            .db
            .query(
                "BEGIN TRANSACTION;
                 LET $existing = (SELECT id FROM listing_view \
                     WHERE listing_id = $listing_id \
                     AND user_id = $user_id \
                     AND ip_address = $ip_address LIMIT 1);
                 IF array::len($existing) > 0 {
                     UPDATE listing_view SET view_count += 1 \
                         WHERE listing_id = $listing_id \
                         AND user_id = $user_id \
                         AND ip_address = $ip_address;
                 } ELSE {
                     CREATE type::record('listing_view', $id) SET \
                         listing_id = $listing_id, \
                         user_id = $user_id, \
                         ip_address = $ip_address, \
                         view_count = 1;
                 };
                 SELECT meta::id(id) AS record_id, * FROM listing_view \
                     WHERE listing_id = $listing_id \
                     AND user_id = $user_id \
                     AND ip_address = $ip_address LIMIT 1;
                 COMMIT TRANSACTION;",
            )
            .bind(("id", id_str.clone()))
            .bind(("listing_id", listing_id.to_string()))
            .bind(("user_id", user_id.map(|u| u.to_string())))
            .bind(("ip_address", ip_address.map(|s| s.to_string())))
            .await
            .map_err(DbError::from)?;

        // The final SELECT is the second-to-last statement; BEGIN and
        // COMMIT each occupy a result slot in the response.
        let statements = result.num_statements();
        let rows: Vec<ListingViewRowWithId> = result
            .take(statements.saturating_sub(2))
            .map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "listing_view".into(),
            id: id_str,
        })?;

        Ok(row.try_into_view()?)
    }

    async fn total_views(&self, listing_id: Uuid) -> RentoraResult<u64> {
        let mut result = self
            .db
            .query(
                "SELECT math::sum(view_count) AS total FROM listing_view \
                 WHERE listing_id = $listing_id GROUP ALL",
            )
            .bind(("listing_id", listing_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SumRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().and_then(|r| r.total).unwrap_or(0))
    }
}

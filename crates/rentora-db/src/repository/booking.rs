//! SurrealDB implementation of [`BookingRepository`].
//!
//! The overlap check in [`BookingRepository::create_if_available`] runs
//! inside a single SurrealDB transaction: a conflicting active booking
//! aborts the transaction with a THROW whose message carries a marker
//! string, which this layer translates to `Ok(None)`. Two bookings for
//! the same listing therefore never interleave between check and insert.

use chrono::{DateTime, Utc};
use rentora_core::error::RentoraResult;
use rentora_core::models::booking::{Booking, BookingStatus, CreateBooking};
use rentora_core::repository::{BookingRepository, PaginatedResult, Pagination};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{CountRow, date_to_string, parse_date, parse_uuid};
use crate::error::DbError;

/// Marker carried by the THROW that aborts an overlapping create.
const OVERLAP_MARKER: &str = "booking_overlap";

/// Statuses that block other bookings from taking the same dates.
const ACTIVE_STATUSES: &str = "['pending', 'confirmed', 'checked']";

#[derive(Debug, SurrealValue)]
struct BookingRow {
    listing_id: String,
    landlord_id: String,
    tenant_id: String,
    start_date: String,
    end_date: String,
    status: String,
    cancellable_until: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct BookingRowWithId {
    record_id: String,
    listing_id: String,
    landlord_id: String,
    tenant_id: String,
    start_date: String,
    end_date: String,
    status: String,
    cancellable_until: String,
    created_at: DateTime<Utc>,
}

fn parse_status(s: &str) -> Result<BookingStatus, DbError> {
    match s {
        "pending" => Ok(BookingStatus::Pending),
        "confirmed" => Ok(BookingStatus::Confirmed),
        "rejected" => Ok(BookingStatus::Rejected),
        "cancelled" => Ok(BookingStatus::Cancelled),
        "checked" => Ok(BookingStatus::Checked),
        other => Err(DbError::Data(format!("unknown booking status: {other}"))),
    }
}

impl BookingRow {
    fn into_booking(self, id: Uuid) -> Result<Booking, DbError> {
        Ok(Booking {
            id,
            listing_id: parse_uuid(&self.listing_id, "listing")?,
            landlord_id: parse_uuid(&self.landlord_id, "landlord")?,
            tenant_id: parse_uuid(&self.tenant_id, "tenant")?,
            start_date: parse_date(&self.start_date, "start")?,
            end_date: parse_date(&self.end_date, "end")?,
            status: parse_status(&self.status)?,
            cancellable_until: parse_date(&self.cancellable_until, "cancellable_until")?,
            created_at: self.created_at,
        })
    }
}

impl BookingRowWithId {
    fn try_into_booking(self) -> Result<Booking, DbError> {
        let id = parse_uuid(&self.record_id, "booking")?;
        Ok(Booking {
            id,
            listing_id: parse_uuid(&self.listing_id, "listing")?,
            landlord_id: parse_uuid(&self.landlord_id, "landlord")?,
            tenant_id: parse_uuid(&self.tenant_id, "tenant")?,
            start_date: parse_date(&self.start_date, "start")?,
            end_date: parse_date(&self.end_date, "end")?,
            status: parse_status(&self.status)?,
            cancellable_until: parse_date(&self.cancellable_until, "cancellable_until")?,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the Booking repository.
#[derive(Clone)]
pub struct SurrealBookingRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealBookingRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn list_where(
        &self,
        condition: &str,
        bind: Option<(&'static str, String)>,
        pagination: Pagination,
    ) -> RentoraResult<PaginatedResult<Booking>> {
        let count_query = format!(
            "SELECT count() AS total FROM booking {condition} GROUP ALL"
        );
        let page_query = format!(
            "SELECT meta::id(id) AS record_id, * FROM booking {condition} \
             ORDER BY created_at DESC \
             LIMIT $limit START $offset"
        );

        let mut count_builder = self.db.query(&count_query);
        if let Some((name, value)) = bind.clone() {
            count_builder = count_builder.bind((name, value));
        }
        let mut count_result = count_builder.await.map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut page_builder = self
            .db
            .query(&page_query)
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset));
        if let Some((name, value)) = bind {
            page_builder = page_builder.bind((name, value));
        }
        let mut result = page_builder.await.map_err(DbError::from)?;

        let rows: Vec<BookingRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_booking())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}

impl<C: Connection> BookingRepository for SurrealBookingRepository<C> {
    async fn create_if_available(&self, input: CreateBooking) -> RentoraResult<Option<Booking>> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        // Check and insert in one transaction. Dates are ISO strings so
        // the half-open interval test is plain string comparison.
        let script = format!(
            "BEGIN TRANSACTION;
             LET $conflict = (SELECT id FROM booking \
                 WHERE listing_id = $listing_id \
                 AND status IN {ACTIVE_STATUSES} \
                 AND start_date < $end_date \
                 AND end_date > $start_date \
                 LIMIT 1);
             IF array::len($conflict) > 0 {{
                 THROW '{OVERLAP_MARKER}';
             }};
             CREATE type::record('booking', $id) SET \
                 listing_id = $listing_id, \
                 landlord_id = $landlord_id, \
                 tenant_id = $tenant_id, \
                 start_date = $start_date, \
                 end_date = $end_date, \
                 status = 'pending', \
                 cancellable_until = $cancellable_until;
             COMMIT TRANSACTION;"
        );

        let result = self
            .db
            .query(&script)
            .bind(("id", id_str.clone()))
            .bind(("listing_id", input.listing_id.to_string()))
            .bind(("landlord_id", input.landlord_id.to_string()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("start_date", date_to_string(input.start_date)))
            .bind(("end_date", date_to_string(input.end_date)))
            .bind(("cancellable_until", date_to_string(input.cancellable_until)))
            .await
            .map_err(DbError::from)?;

        // A failed transaction masks most statement slots with a generic
        // "not executed" error; the THROW's message sits only on the IF
        // statement's slot, so scan every error for the marker.
        let mut result = result;
        let errors = result.take_errors();
        if !errors.is_empty() {
            if errors
                .values()
                .any(|e| e.to_string().contains(OVERLAP_MARKER))
            {
                return Ok(None);
            }
            let mut errors: Vec<_> = errors.into_iter().collect();
            errors.sort_by_key(|(i, _)| *i);
            let (_, e) = errors.remove(0);
            return Err(DbError::Surreal(e).into());
        }

        // The CREATE is the last statement producing rows; it sits
        // second-to-last because BEGIN and COMMIT each occupy a result
        // slot in the response.
        let statements = result.num_statements();
        let rows: Vec<BookingRow> = result
            .take(statements.saturating_sub(2))
            .map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "booking".into(),
            id: id_str,
        })?;

        Ok(Some(row.into_booking(id)?))
    }

    async fn get_by_id(&self, id: Uuid) -> RentoraResult<Booking> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('booking', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<BookingRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "booking".into(),
            id: id_str,
        })?;

        Ok(row.into_booking(id)?)
    }

    async fn set_status(&self, id: Uuid, status: BookingStatus) -> RentoraResult<Booking> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("UPDATE type::record('booking', $id) SET status = $status")
            .bind(("id", id_str.clone()))
            .bind(("status", status.as_str().to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<BookingRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "booking".into(),
            id: id_str,
        })?;

        Ok(row.into_booking(id)?)
    }

    async fn list_all(&self, pagination: Pagination) -> RentoraResult<PaginatedResult<Booking>> {
        self.list_where("", None, pagination).await
    }

    async fn list_by_tenant(
        &self,
        tenant_id: Uuid,
        pagination: Pagination,
    ) -> RentoraResult<PaginatedResult<Booking>> {
        self.list_where(
            "WHERE tenant_id = $tenant_id",
            Some(("tenant_id", tenant_id.to_string())),
            pagination,
        )
        .await
    }

    async fn list_by_landlord(
        &self,
        landlord_id: Uuid,
        pagination: Pagination,
    ) -> RentoraResult<PaginatedResult<Booking>> {
        self.list_where(
            "WHERE landlord_id = $landlord_id",
            Some(("landlord_id", landlord_id.to_string())),
            pagination,
        )
        .await
    }

    async fn has_checked_booking(&self, tenant_id: Uuid, listing_id: Uuid) -> RentoraResult<bool> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM booking \
                 WHERE tenant_id = $tenant_id \
                 AND listing_id = $listing_id \
                 AND status = 'checked' GROUP ALL",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("listing_id", listing_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0) > 0)
    }
}

//! SurrealDB implementation of [`ListingRepository`].
//!
//! Search assembles a dynamic WHERE clause from the populated filter
//! fields; visibility adds one more predicate derived from the caller's
//! role.

use chrono::{DateTime, Utc};
use rentora_core::error::RentoraResult;
use rentora_core::models::listing::{
    CreateListing, HousingType, Listing, ListingOrder, ListingQuery, ListingVisibility,
    UpdateListing,
};
use rentora_core::repository::{ListingRepository, PaginatedResult, Pagination};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{CountRow, parse_uuid};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ListingRow {
    landlord_id: String,
    title: String,
    description: String,
    location: String,
    price_cents: i64,
    rooms: u32,
    housing_type: String,
    is_active: bool,
    cancellation_deadline_days: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct ListingRowWithId {
    record_id: String,
    landlord_id: String,
    title: String,
    description: String,
    location: String,
    price_cents: i64,
    rooms: u32,
    housing_type: String,
    is_active: bool,
    cancellation_deadline_days: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_housing_type(s: &str) -> Result<HousingType, DbError> {
    match s {
        "apartment" => Ok(HousingType::Apartment),
        "house" => Ok(HousingType::House),
        "studio" => Ok(HousingType::Studio),
        "room" => Ok(HousingType::Room),
        other => Err(DbError::Data(format!("unknown housing type: {other}"))),
    }
}

impl ListingRow {
    fn into_listing(self, id: Uuid) -> Result<Listing, DbError> {
        Ok(Listing {
            id,
            landlord_id: parse_uuid(&self.landlord_id, "landlord")?,
            title: self.title,
            description: self.description,
            location: self.location,
            price_cents: self.price_cents,
            rooms: self.rooms,
            housing_type: parse_housing_type(&self.housing_type)?,
            is_active: self.is_active,
            cancellation_deadline_days: self.cancellation_deadline_days,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl ListingRowWithId {
    fn try_into_listing(self) -> Result<Listing, DbError> {
        let id = parse_uuid(&self.record_id, "listing")?;
        Ok(Listing {
            id,
            landlord_id: parse_uuid(&self.landlord_id, "landlord")?,
            title: self.title,
            description: self.description,
            location: self.location,
            price_cents: self.price_cents,
            rooms: self.rooms,
            housing_type: parse_housing_type(&self.housing_type)?,
            is_active: self.is_active,
            cancellation_deadline_days: self.cancellation_deadline_days,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn order_clause(order: Option<ListingOrder>) -> &'static str {
    match order.unwrap_or(ListingOrder::Newest) {
        ListingOrder::PriceAsc => "ORDER BY price_cents ASC",
        ListingOrder::PriceDesc => "ORDER BY price_cents DESC",
        ListingOrder::Newest => "ORDER BY created_at DESC",
        ListingOrder::Oldest => "ORDER BY created_at ASC",
    }
}

/// SurrealDB implementation of the Listing repository.
#[derive(Clone)]
pub struct SurrealListingRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealListingRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ListingRepository for SurrealListingRepository<C> {
    async fn create(&self, input: CreateListing) -> RentoraResult<Listing> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('listing', $id) SET \
                 landlord_id = $landlord_id, \
                 title = $title, description = $description, \
                 location = $location, \
                 price_cents = $price_cents, rooms = $rooms, \
                 housing_type = $housing_type, \
                 is_active = true, \
                 cancellation_deadline_days = $deadline_days",
            )
            .bind(("id", id_str.clone()))
            .bind(("landlord_id", input.landlord_id.to_string()))
            .bind(("title", input.title))
            .bind(("description", input.description))
            .bind(("location", input.location))
            .bind(("price_cents", input.price_cents))
            .bind(("rooms", input.rooms))
            .bind(("housing_type", input.housing_type.as_str().to_string()))
            .bind(("deadline_days", input.cancellation_deadline_days))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::Data(e.to_string()))?;

        let rows: Vec<ListingRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "listing".into(),
            id: id_str,
        })?;

        Ok(row.into_listing(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> RentoraResult<Listing> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('listing', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ListingRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "listing".into(),
            id: id_str,
        })?;

        Ok(row.into_listing(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdateListing) -> RentoraResult<Listing> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.title.is_some() {
            sets.push("title = $title");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        if input.location.is_some() {
            sets.push("location = $location");
        }
        if input.price_cents.is_some() {
            sets.push("price_cents = $price_cents");
        }
        if input.rooms.is_some() {
            sets.push("rooms = $rooms");
        }
        if input.housing_type.is_some() {
            sets.push("housing_type = $housing_type");
        }
        if input.is_active.is_some() {
            sets.push("is_active = $is_active");
        }
        if input.cancellation_deadline_days.is_some() {
            sets.push("cancellation_deadline_days = $deadline_days");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('listing', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(title) = input.title {
            builder = builder.bind(("title", title));
        }
        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }
        if let Some(location) = input.location {
            builder = builder.bind(("location", location));
        }
        if let Some(price_cents) = input.price_cents {
            builder = builder.bind(("price_cents", price_cents));
        }
        if let Some(rooms) = input.rooms {
            builder = builder.bind(("rooms", rooms));
        }
        if let Some(ref housing_type) = input.housing_type {
            builder = builder.bind(("housing_type", housing_type.as_str().to_string()));
        }
        if let Some(is_active) = input.is_active {
            builder = builder.bind(("is_active", is_active));
        }
        if let Some(deadline_days) = input.cancellation_deadline_days {
            builder = builder.bind(("deadline_days", deadline_days));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(|e| DbError::Data(e.to_string()))?;

        let rows: Vec<ListingRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "listing".into(),
            id: id_str,
        })?;

        Ok(row.into_listing(id)?)
    }

    async fn delete(&self, id: Uuid) -> RentoraResult<()> {
        let id_str = id.to_string();

        self.db
            .query("DELETE type::record('listing', $id)")
            .bind(("id", id_str))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn search(
        &self,
        query: ListingQuery,
        visibility: ListingVisibility,
        pagination: Pagination,
    ) -> RentoraResult<PaginatedResult<Listing>> {
        let mut conditions = Vec::new();

        match &visibility {
            ListingVisibility::ActiveOnly => conditions.push("is_active = true".to_string()),
            ListingVisibility::ActiveOrOwnedBy(_) => {
                conditions.push("(is_active = true OR landlord_id = $viewer_id)".to_string());
            }
            ListingVisibility::All => {}
        }
        if query.min_price_cents.is_some() {
            conditions.push("price_cents >= $min_price".to_string());
        }
        if query.max_price_cents.is_some() {
            conditions.push("price_cents <= $max_price".to_string());
        }
        if query.min_rooms.is_some() {
            conditions.push("rooms >= $min_rooms".to_string());
        }
        if query.max_rooms.is_some() {
            conditions.push("rooms <= $max_rooms".to_string());
        }
        if query.location.is_some() {
            conditions.push(
                "string::contains(string::lowercase(location), \
                 string::lowercase($location))"
                    .to_string(),
            );
        }
        if query.housing_type.is_some() {
            conditions.push("housing_type = $housing_type".to_string());
        }
        if query.keyword.is_some() {
            conditions.push(
                "(string::contains(string::lowercase(title), \
                 string::lowercase($keyword)) OR \
                 string::contains(string::lowercase(description), \
                 string::lowercase($keyword)))"
                    .to_string(),
            );
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_query = format!(
            "SELECT count() AS total FROM listing {where_clause} GROUP ALL"
        );
        let page_query = format!(
            "SELECT meta::id(id) AS record_id, * FROM listing {where_clause} \
             {} LIMIT $limit START $offset",
            order_clause(query.order)
        );

        // Both queries share the same filter bindings.
        macro_rules! bind_filters {
            ($builder:expr) => {{
                let mut builder = $builder;
                if let ListingVisibility::ActiveOrOwnedBy(viewer_id) = &visibility {
                    builder = builder.bind(("viewer_id", viewer_id.to_string()));
                }
                if let Some(min_price) = query.min_price_cents {
                    builder = builder.bind(("min_price", min_price));
                }
                if let Some(max_price) = query.max_price_cents {
                    builder = builder.bind(("max_price", max_price));
                }
                if let Some(min_rooms) = query.min_rooms {
                    builder = builder.bind(("min_rooms", min_rooms));
                }
                if let Some(max_rooms) = query.max_rooms {
                    builder = builder.bind(("max_rooms", max_rooms));
                }
                if let Some(ref location) = query.location {
                    builder = builder.bind(("location", location.clone()));
                }
                if let Some(ref housing_type) = query.housing_type {
                    builder = builder.bind(("housing_type", housing_type.as_str().to_string()));
                }
                if let Some(ref keyword) = query.keyword {
                    builder = builder.bind(("keyword", keyword.clone()));
                }
                builder
            }};
        }

        let mut count_result = bind_filters!(self.db.query(&count_query))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = bind_filters!(self.db.query(&page_query))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ListingRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_listing())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn list_by_landlord(
        &self,
        landlord_id: Uuid,
        pagination: Pagination,
    ) -> RentoraResult<PaginatedResult<Listing>> {
        let landlord_id_str = landlord_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM listing \
                 WHERE landlord_id = $landlord_id GROUP ALL",
            )
            .bind(("landlord_id", landlord_id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM listing \
                 WHERE landlord_id = $landlord_id \
                 ORDER BY created_at DESC \
                 LIMIT $limit START $offset",
            )
            .bind(("landlord_id", landlord_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ListingRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_listing())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}

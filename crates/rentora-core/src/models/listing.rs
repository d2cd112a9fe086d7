//! Listing domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HousingType {
    Apartment,
    House,
    Studio,
    Room,
}

impl HousingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HousingType::Apartment => "apartment",
            HousingType::House => "house",
            HousingType::Studio => "studio",
            HousingType::Room => "room",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: Uuid,
    pub landlord_id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    /// Nightly price in minor currency units (cents).
    pub price_cents: i64,
    pub rooms: u32,
    pub housing_type: HousingType,
    pub is_active: bool,
    /// Days before `start_date` after which a confirmed booking can no
    /// longer be cancelled by the tenant.
    pub cancellation_deadline_days: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateListing {
    pub landlord_id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub price_cents: i64,
    pub rooms: u32,
    pub housing_type: HousingType,
    pub cancellation_deadline_days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateListing {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub price_cents: Option<i64>,
    pub rooms: Option<u32>,
    pub housing_type: Option<HousingType>,
    pub is_active: Option<bool>,
    pub cancellation_deadline_days: Option<u32>,
}

/// Which listings a caller is allowed to see, derived from their role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingVisibility {
    /// Anonymous users and tenants: active listings only.
    ActiveOnly,
    /// Landlords: active listings plus everything they own.
    ActiveOrOwnedBy(Uuid),
    /// Administrators: everything.
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingOrder {
    PriceAsc,
    PriceDesc,
    Newest,
    Oldest,
}

/// Filter set for listing search queries.
#[derive(Debug, Clone, Default)]
pub struct ListingQuery {
    pub min_price_cents: Option<i64>,
    pub max_price_cents: Option<i64>,
    pub min_rooms: Option<u32>,
    pub max_rooms: Option<u32>,
    /// Case-insensitive substring match on location.
    pub location: Option<String>,
    pub housing_type: Option<HousingType>,
    /// Case-insensitive substring match on title or description.
    pub keyword: Option<String>,
    pub order: Option<ListingOrder>,
}

//! Review domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tenant's review of a listing. At most one per (tenant, listing).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub tenant_id: Uuid,
    /// 1–5 stars.
    pub rating: u8,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReview {
    pub listing_id: Uuid,
    pub tenant_id: Uuid,
    pub rating: u8,
    pub comment: Option<String>,
}

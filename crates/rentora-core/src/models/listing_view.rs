//! Listing view-counter domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-viewer view counter for a listing, keyed by
/// (listing, user?, ip?).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingView {
    pub id: Uuid,
    pub listing_id: Uuid,
    /// `None` for anonymous viewers.
    pub user_id: Option<Uuid>,
    pub ip_address: Option<String>,
    pub view_count: u64,
    pub created_at: DateTime<Utc>,
}

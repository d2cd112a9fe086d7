//! Search history domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One keyword a user (or anonymous visitor) has searched for, with a
/// counter incremented on every repeat search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHistory {
    pub id: Uuid,
    /// `None` for anonymous searches.
    pub user_id: Option<Uuid>,
    pub keyword: String,
    pub search_count: u64,
    pub created_at: DateTime<Utc>,
}

/// Aggregated search popularity: total count per keyword across users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopularSearch {
    pub keyword: String,
    pub total: u64,
}

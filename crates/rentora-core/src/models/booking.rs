//! Booking domain model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a booking.
///
/// `Pending` is the initial state; `Checked`, `Rejected` and `Cancelled`
/// are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Rejected,
    Cancelled,
    Checked,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Rejected => "rejected",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Checked => "checked",
        }
    }

    /// Statuses that block other bookings from taking the same dates.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            BookingStatus::Pending | BookingStatus::Confirmed | BookingStatus::Checked
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::Checked | BookingStatus::Rejected | BookingStatus::Cancelled
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub listing_id: Uuid,
    /// Denormalised from the listing so landlord-scoped queries need no join.
    pub landlord_id: Uuid,
    pub tenant_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: BookingStatus,
    /// Last date the tenant may cancel a confirmed booking. Computed once
    /// at creation, immutable afterward.
    pub cancellable_until: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Fully-resolved insert record. Built by the booking service after range
/// validation; the repository persists it only if no active booking for the
/// same listing overlaps `[start_date, end_date)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBooking {
    pub listing_id: Uuid,
    pub landlord_id: Uuid,
    pub tenant_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub cancellable_until: NaiveDate,
}

/// Partial-update payload for a booking mutation request.
///
/// Post-creation, only `status` is writable; every other populated field is
/// rejected with an immutable-field error.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BookingUpdate {
    pub status: Option<BookingStatus>,
    pub listing_id: Option<Uuid>,
    pub tenant_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub cancellable_until: Option<NaiveDate>,
}

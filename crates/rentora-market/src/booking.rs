//! Booking service — creation with overlap protection and the status
//! lifecycle.

pub mod state;

use chrono::{Days, NaiveDate, Utc};
use rentora_core::error::{RentoraError, RentoraResult};
use rentora_core::models::booking::{Booking, BookingStatus, BookingUpdate, CreateBooking};
use rentora_core::permissions;
use rentora_core::repository::{
    BookingRepository, ListingRepository, PaginatedResult, Pagination,
};
use rentora_core::models::user::{Role, User};
use tracing::debug;
use uuid::Uuid;

use crate::error::BookingError;
use state::TransitionPolicy;

/// What a tenant supplies when booking a listing. Everything else
/// (status, cancellable_until, tenant) is derived server-side.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub listing_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Booking service.
///
/// Generic over repository implementations so the lifecycle logic has no
/// dependency on the database crate.
pub struct BookingService<B: BookingRepository, L: ListingRepository> {
    bookings: B,
    listings: L,
    policy: TransitionPolicy,
}

impl<B: BookingRepository, L: ListingRepository> BookingService<B, L> {
    pub fn new(bookings: B, listings: L) -> Self {
        Self::with_policy(bookings, listings, TransitionPolicy::default())
    }

    pub fn with_policy(bookings: B, listings: L, policy: TransitionPolicy) -> Self {
        Self {
            bookings,
            listings,
            policy,
        }
    }

    /// Create a pending booking for the caller.
    ///
    /// Fails with `InvalidRange` when `start_date > end_date` and with
    /// `Overlap` when an active booking for the listing intersects
    /// `[start_date, end_date)`. The overlap check and the insert are
    /// atomic in the repository.
    pub async fn create(&self, actor: &User, request: BookingRequest) -> RentoraResult<Booking> {
        if !permissions::can_create_booking(actor) {
            return Err(BookingError::Unauthorized {
                reason: "only tenants may book listings".into(),
            }
            .into());
        }

        if request.start_date > request.end_date {
            return Err(BookingError::InvalidRange.into());
        }

        let listing = self.listings.get_by_id(request.listing_id).await?;

        // Last cancellable date, fixed at creation time.
        let cancellable_until = request
            .start_date
            .checked_sub_days(Days::new(u64::from(listing.cancellation_deadline_days)))
            .ok_or_else(|| RentoraError::Validation {
                message: "start date is out of range".into(),
            })?;

        let created = self
            .bookings
            .create_if_available(CreateBooking {
                listing_id: listing.id,
                landlord_id: listing.landlord_id,
                tenant_id: actor.id,
                start_date: request.start_date,
                end_date: request.end_date,
                cancellable_until,
            })
            .await?;

        match created {
            Some(booking) => {
                debug!(booking_id = %booking.id, listing_id = %listing.id, "booking created");
                Ok(booking)
            }
            None => Err(BookingError::Overlap.into()),
        }
    }

    /// Apply a partial update to a booking.
    ///
    /// Post-creation only `status` is writable; any other populated field
    /// fails with `ImmutableField`. The requested status change is checked
    /// against the transition table before anything is persisted.
    pub async fn update(
        &self,
        actor: &User,
        booking_id: Uuid,
        update: BookingUpdate,
    ) -> RentoraResult<Booking> {
        reject_immutable_fields(&update)?;
        let new_status = update.status.ok_or_else(|| RentoraError::Validation {
            message: "a booking update must supply `status`".into(),
        })?;

        let booking = self.bookings.get_by_id(booking_id).await?;

        if !permissions::can_access_booking(actor, &booking) {
            return Err(BookingError::Unauthorized {
                reason: "booking belongs to another tenant or listing".into(),
            }
            .into());
        }

        let today = Utc::now().date_naive();
        state::check_transition(&booking, actor, new_status, today, &self.policy)?;

        let updated = self.bookings.set_status(booking_id, new_status).await?;
        debug!(
            booking_id = %booking_id,
            from = booking.status.as_str(),
            to = new_status.as_str(),
            "booking transitioned"
        );
        Ok(updated)
    }

    /// Fetch a single booking, enforcing object-level visibility.
    pub async fn get(&self, actor: &User, booking_id: Uuid) -> RentoraResult<Booking> {
        let booking = self.bookings.get_by_id(booking_id).await?;
        if !permissions::can_access_booking(actor, &booking) {
            return Err(BookingError::Unauthorized {
                reason: "booking belongs to another tenant or listing".into(),
            }
            .into());
        }
        Ok(booking)
    }

    /// Role-scoped booking list: administrators see everything, landlords
    /// the bookings on their listings, tenants their own.
    pub async fn list_for(
        &self,
        actor: &User,
        pagination: Pagination,
    ) -> RentoraResult<PaginatedResult<Booking>> {
        match actor.role {
            Role::Administrator => self.bookings.list_all(pagination).await,
            Role::Landlord => self.bookings.list_by_landlord(actor.id, pagination).await,
            Role::Tenant => self.bookings.list_by_tenant(actor.id, pagination).await,
        }
    }
}

fn reject_immutable_fields(update: &BookingUpdate) -> Result<(), BookingError> {
    let field = if update.listing_id.is_some() {
        "listing_id"
    } else if update.tenant_id.is_some() {
        "tenant_id"
    } else if update.start_date.is_some() {
        "start_date"
    } else if update.end_date.is_some() {
        "end_date"
    } else if update.cancellable_until.is_some() {
        "cancellable_until"
    } else {
        return Ok(());
    };
    Err(BookingError::ImmutableField { field })
}

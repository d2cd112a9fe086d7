//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Each entity gets its own trait with
//! named query methods so the domain services never see a query language.

use uuid::Uuid;

use crate::error::RentoraResult;
use crate::models::{
    booking::{Booking, BookingStatus, CreateBooking},
    listing::{CreateListing, Listing, ListingQuery, ListingVisibility, UpdateListing},
    listing_view::ListingView,
    review::{CreateReview, Review},
    revoked_token::{CreateRevokedToken, RevokedToken},
    search_history::{PopularSearch, SearchHistory},
    user::{CreateUser, UpdateUser, User},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    fn create(&self, input: CreateUser) -> impl Future<Output = RentoraResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = RentoraResult<User>> + Send;
    fn get_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = RentoraResult<User>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = RentoraResult<User>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateUser,
    ) -> impl Future<Output = RentoraResult<User>> + Send;
    /// Replace the stored password hash (raw password is hashed here).
    fn set_password(
        &self,
        id: Uuid,
        raw_password: &str,
    ) -> impl Future<Output = RentoraResult<()>> + Send;
    /// Soft-delete: sets `is_active` to false.
    fn delete(&self, id: Uuid) -> impl Future<Output = RentoraResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = RentoraResult<PaginatedResult<User>>> + Send;
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

pub trait ListingRepository: Send + Sync {
    fn create(&self, input: CreateListing)
    -> impl Future<Output = RentoraResult<Listing>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = RentoraResult<Listing>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateListing,
    ) -> impl Future<Output = RentoraResult<Listing>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = RentoraResult<()>> + Send;
    /// Filtered, visibility-scoped, paginated search.
    fn search(
        &self,
        query: ListingQuery,
        visibility: ListingVisibility,
        pagination: Pagination,
    ) -> impl Future<Output = RentoraResult<PaginatedResult<Listing>>> + Send;
    fn list_by_landlord(
        &self,
        landlord_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = RentoraResult<PaginatedResult<Listing>>> + Send;
}

// ---------------------------------------------------------------------------
// Bookings
// ---------------------------------------------------------------------------

pub trait BookingRepository: Send + Sync {
    /// Insert a pending booking if and only if no active booking for the
    /// same listing overlaps `[start_date, end_date)` (half-open).
    ///
    /// The overlap check and the insert must be atomic with respect to
    /// concurrent creates for the same listing. Returns `Ok(None)` when an
    /// overlapping booking exists.
    fn create_if_available(
        &self,
        input: CreateBooking,
    ) -> impl Future<Output = RentoraResult<Option<Booking>>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = RentoraResult<Booking>> + Send;
    /// Persist a status change. No other field is ever updated.
    fn set_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> impl Future<Output = RentoraResult<Booking>> + Send;
    fn list_all(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = RentoraResult<PaginatedResult<Booking>>> + Send;
    fn list_by_tenant(
        &self,
        tenant_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = RentoraResult<PaginatedResult<Booking>>> + Send;
    fn list_by_landlord(
        &self,
        landlord_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = RentoraResult<PaginatedResult<Booking>>> + Send;
    /// Whether the tenant has a `checked` booking on the listing
    /// (review eligibility).
    fn has_checked_booking(
        &self,
        tenant_id: Uuid,
        listing_id: Uuid,
    ) -> impl Future<Output = RentoraResult<bool>> + Send;
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

pub trait ReviewRepository: Send + Sync {
    fn create(&self, input: CreateReview) -> impl Future<Output = RentoraResult<Review>> + Send;
    fn exists_for(
        &self,
        tenant_id: Uuid,
        listing_id: Uuid,
    ) -> impl Future<Output = RentoraResult<bool>> + Send;
    fn list_by_listing(
        &self,
        listing_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = RentoraResult<PaginatedResult<Review>>> + Send;
    fn count_by_listing(
        &self,
        listing_id: Uuid,
    ) -> impl Future<Output = RentoraResult<u64>> + Send;
}

// ---------------------------------------------------------------------------
// Search history
// ---------------------------------------------------------------------------

pub trait SearchHistoryRepository: Send + Sync {
    /// Upsert keyed by (user, keyword): create with count 1, or increment.
    fn record(
        &self,
        user_id: Option<Uuid>,
        keyword: &str,
    ) -> impl Future<Output = RentoraResult<SearchHistory>> + Send;
    /// Most-searched keywords across all users, by summed count.
    fn popular(
        &self,
        limit: u64,
    ) -> impl Future<Output = RentoraResult<Vec<PopularSearch>>> + Send;
    /// A user's own history, newest first.
    fn list_by_user(
        &self,
        user_id: Uuid,
        limit: u64,
    ) -> impl Future<Output = RentoraResult<Vec<SearchHistory>>> + Send;
}

// ---------------------------------------------------------------------------
// Listing views
// ---------------------------------------------------------------------------

pub trait ListingViewRepository: Send + Sync {
    /// Upsert keyed by (listing, user?, ip?): create with count 1, or
    /// increment.
    fn record(
        &self,
        listing_id: Uuid,
        user_id: Option<Uuid>,
        ip_address: Option<&str>,
    ) -> impl Future<Output = RentoraResult<ListingView>> + Send;
    /// Total views across all viewers of a listing.
    fn total_views(&self, listing_id: Uuid) -> impl Future<Output = RentoraResult<u64>> + Send;
}

// ---------------------------------------------------------------------------
// Revoked refresh tokens (append-only blacklist)
// ---------------------------------------------------------------------------

pub trait RevokedTokenRepository: Send + Sync {
    /// Append a revocation. Revoking an already-revoked jti is a no-op.
    fn revoke(
        &self,
        input: CreateRevokedToken,
    ) -> impl Future<Output = RentoraResult<RevokedToken>> + Send;
    fn is_revoked(&self, jti: &str) -> impl Future<Output = RentoraResult<bool>> + Send;
    /// Remove entries whose tokens have expired anyway.
    fn cleanup_expired(&self) -> impl Future<Output = RentoraResult<u64>> + Send;
}

//! Listing service — CRUD and filtered search with role-dependent
//! visibility.

use rentora_core::error::{RentoraError, RentoraResult};
use rentora_core::models::listing::{
    CreateListing, HousingType, Listing, ListingQuery, ListingVisibility, UpdateListing,
};
use rentora_core::models::user::{Role, User};
use rentora_core::permissions;
use rentora_core::repository::{ListingRepository, PaginatedResult, Pagination};
use tracing::debug;
use uuid::Uuid;

/// What a landlord supplies when publishing a listing; ownership is
/// derived from the caller.
#[derive(Debug, Clone)]
pub struct NewListing {
    pub title: String,
    pub description: String,
    pub location: String,
    pub price_cents: i64,
    pub rooms: u32,
    pub housing_type: HousingType,
    pub cancellation_deadline_days: u32,
}

pub struct ListingService<L: ListingRepository> {
    listings: L,
}

impl<L: ListingRepository> ListingService<L> {
    pub fn new(listings: L) -> Self {
        Self { listings }
    }

    /// Publish a new listing owned by the caller. New listings start
    /// active.
    pub async fn create(&self, actor: &User, input: NewListing) -> RentoraResult<Listing> {
        if !permissions::can_create_listing(actor) {
            return Err(RentoraError::AuthorizationDenied {
                reason: "only landlords may publish listings".into(),
            });
        }

        let listing = self
            .listings
            .create(CreateListing {
                landlord_id: actor.id,
                title: input.title,
                description: input.description,
                location: input.location,
                price_cents: input.price_cents,
                rooms: input.rooms,
                housing_type: input.housing_type,
                cancellation_deadline_days: input.cancellation_deadline_days,
            })
            .await?;

        debug!(listing_id = %listing.id, landlord_id = %actor.id, "listing published");
        Ok(listing)
    }

    pub async fn update(
        &self,
        actor: &User,
        listing_id: Uuid,
        input: UpdateListing,
    ) -> RentoraResult<Listing> {
        let listing = self.listings.get_by_id(listing_id).await?;
        if !permissions::can_modify_listing(actor, &listing) {
            return Err(RentoraError::AuthorizationDenied {
                reason: "listing belongs to another landlord".into(),
            });
        }
        self.listings.update(listing_id, input).await
    }

    pub async fn delete(&self, actor: &User, listing_id: Uuid) -> RentoraResult<()> {
        let listing = self.listings.get_by_id(listing_id).await?;
        if !permissions::can_modify_listing(actor, &listing) {
            return Err(RentoraError::AuthorizationDenied {
                reason: "listing belongs to another landlord".into(),
            });
        }
        self.listings.delete(listing_id).await
    }

    pub async fn get(&self, listing_id: Uuid) -> RentoraResult<Listing> {
        self.listings.get_by_id(listing_id).await
    }

    /// Filtered search. Visibility depends on who is asking: anonymous
    /// users and tenants see active listings only, a landlord additionally
    /// sees all of their own, administrators see everything.
    pub async fn search(
        &self,
        actor: Option<&User>,
        query: ListingQuery,
        pagination: Pagination,
    ) -> RentoraResult<PaginatedResult<Listing>> {
        let visibility = match actor {
            Some(user) if user.role == Role::Administrator => ListingVisibility::All,
            Some(user) if user.role == Role::Landlord => {
                ListingVisibility::ActiveOrOwnedBy(user.id)
            }
            _ => ListingVisibility::ActiveOnly,
        };
        self.listings.search(query, visibility, pagination).await
    }

    /// All listings owned by the caller, active or not.
    pub async fn my_listings(
        &self,
        actor: &User,
        pagination: Pagination,
    ) -> RentoraResult<PaginatedResult<Listing>> {
        self.listings.list_by_landlord(actor.id, pagination).await
    }
}

//! Listing view counter service.

use rentora_core::error::RentoraResult;
use rentora_core::models::listing::Listing;
use rentora_core::models::user::User;
use rentora_core::repository::ListingViewRepository;
use uuid::Uuid;

pub struct ViewService<V: ListingViewRepository> {
    views: V,
}

impl<V: ListingViewRepository> ViewService<V> {
    pub fn new(views: V) -> Self {
        Self { views }
    }

    /// Record one view of a listing, keyed by (listing, user?, ip?).
    /// Landlords viewing their own listings are not counted.
    pub async fn record_view(
        &self,
        listing: &Listing,
        viewer: Option<&User>,
        ip_address: Option<&str>,
    ) -> RentoraResult<()> {
        if let Some(user) = viewer {
            if user.id == listing.landlord_id {
                return Ok(());
            }
        }
        self.views
            .record(listing.id, viewer.map(|u| u.id), ip_address)
            .await
            .map(|_| ())
    }

    /// Total recorded views for a listing.
    pub async fn total_views(&self, listing_id: Uuid) -> RentoraResult<u64> {
        self.views.total_views(listing_id).await
    }
}

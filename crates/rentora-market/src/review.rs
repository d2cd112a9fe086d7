//! Review service.
//!
//! A review requires a completed (`checked`) booking by the reviewer on
//! the listing, and each tenant may review a listing once.

use rentora_core::error::{RentoraError, RentoraResult};
use rentora_core::models::review::{CreateReview, Review};
use rentora_core::models::user::User;
use rentora_core::permissions;
use rentora_core::repository::{
    BookingRepository, PaginatedResult, Pagination, ReviewRepository,
};
use tracing::debug;
use uuid::Uuid;

pub struct ReviewService<R: ReviewRepository, B: BookingRepository> {
    reviews: R,
    bookings: B,
}

impl<R: ReviewRepository, B: BookingRepository> ReviewService<R, B> {
    pub fn new(reviews: R, bookings: B) -> Self {
        Self { reviews, bookings }
    }

    pub async fn add_review(
        &self,
        actor: &User,
        listing_id: Uuid,
        rating: u8,
        comment: Option<String>,
    ) -> RentoraResult<Review> {
        if !permissions::can_review(actor) {
            return Err(RentoraError::AuthorizationDenied {
                reason: "only tenants can leave reviews".into(),
            });
        }

        if !(1..=5).contains(&rating) {
            return Err(RentoraError::Validation {
                message: "rating must be between 1 and 5".into(),
            });
        }

        let eligible = self
            .bookings
            .has_checked_booking(actor.id, listing_id)
            .await?;
        if !eligible {
            return Err(RentoraError::Validation {
                message: "you can only leave a review after a completed booking for this listing"
                    .into(),
            });
        }

        if self.reviews.exists_for(actor.id, listing_id).await? {
            return Err(RentoraError::AlreadyExists {
                entity: "review".into(),
            });
        }

        let review = self
            .reviews
            .create(CreateReview {
                listing_id,
                tenant_id: actor.id,
                rating,
                comment,
            })
            .await?;

        debug!(review_id = %review.id, listing_id = %listing_id, "review added");
        Ok(review)
    }

    pub async fn list_for_listing(
        &self,
        listing_id: Uuid,
        pagination: Pagination,
    ) -> RentoraResult<PaginatedResult<Review>> {
        self.reviews.list_by_listing(listing_id, pagination).await
    }
}

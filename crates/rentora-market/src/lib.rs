//! Rentora Market — marketplace domain services: the booking lifecycle
//! state machine, listing search, reviews, search history, and view
//! counters. All services are generic over the `rentora-core` repository
//! traits and perform no I/O of their own.

pub mod booking;
pub mod error;
pub mod listing;
pub mod review;
pub mod search;
pub mod view;

pub use booking::{BookingRequest, BookingService};
pub use booking::state::TransitionPolicy;
pub use error::BookingError;
pub use listing::{ListingService, NewListing};
pub use review::ReviewService;
pub use search::SearchService;
pub use view::ViewService;

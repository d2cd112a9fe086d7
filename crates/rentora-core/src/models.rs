//! Domain models for Rentora.
//!
//! These are the core types shared across all crates.

pub mod booking;
pub mod listing;
pub mod listing_view;
pub mod review;
pub mod revoked_token;
pub mod search_history;
pub mod user;

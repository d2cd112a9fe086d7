//! Rentora Core — domain models, repository trait definitions, and
//! role/permission predicates shared across all crates.

pub mod error;
pub mod models;
pub mod permissions;
pub mod repository;

pub use error::{RentoraError, RentoraResult};

//! SurrealDB repository implementations.

mod booking;
mod listing;
mod listing_view;
mod review;
mod revoked_token;
mod search_history;
mod user;

pub use booking::SurrealBookingRepository;
pub use listing::SurrealListingRepository;
pub use listing_view::SurrealListingViewRepository;
pub use review::SurrealReviewRepository;
pub use revoked_token::SurrealRevokedTokenRepository;
pub use search_history::SurrealSearchHistoryRepository;
pub use user::SurrealUserRepository;

use chrono::NaiveDate;
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
pub(crate) struct CountRow {
    pub(crate) total: u64,
}

pub(crate) fn parse_uuid(s: &str, what: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(s).map_err(|e| DbError::Data(format!("invalid {what} UUID: {e}")))
}

/// Dates are stored as ISO `YYYY-MM-DD` strings.
pub(crate) fn parse_date(s: &str, what: &str) -> Result<NaiveDate, DbError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| DbError::Data(format!("invalid {what} date: {e}")))
}

pub(crate) fn date_to_string(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_strings_round_trip() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let s = date_to_string(date);
        assert_eq!(s, "2024-06-10");
        assert_eq!(parse_date(&s, "start").unwrap(), date);
    }

    #[test]
    fn date_strings_order_lexicographically() {
        let a = date_to_string(NaiveDate::from_ymd_opt(2024, 6, 9).unwrap());
        let b = date_to_string(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
        let c = date_to_string(NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
        assert!(a < b && b < c);
    }
}

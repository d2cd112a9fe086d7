//! Integration tests for the booking repository's atomic overlap guard.

use chrono::NaiveDate;
use rentora_core::models::booking::{BookingStatus, CreateBooking};
use rentora_core::repository::{BookingRepository, Pagination};
use rentora_db::repository::SurrealBookingRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

async fn setup() -> SurrealBookingRepository<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    rentora_db::run_migrations(&db).await.unwrap();
    SurrealBookingRepository::new(db)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn booking_for(listing_id: Uuid, start: NaiveDate, end: NaiveDate) -> CreateBooking {
    CreateBooking {
        listing_id,
        landlord_id: Uuid::new_v4(),
        tenant_id: Uuid::new_v4(),
        start_date: start,
        end_date: end,
        cancellable_until: start,
    }
}

#[tokio::test]
async fn create_and_round_trip() {
    let repo = setup().await;
    let listing_id = Uuid::new_v4();

    let created = repo
        .create_if_available(booking_for(listing_id, date(2024, 6, 10), date(2024, 6, 15)))
        .await
        .unwrap()
        .expect("dates are free");

    assert_eq!(created.status, BookingStatus::Pending);
    assert_eq!(created.start_date, date(2024, 6, 10));
    assert_eq!(created.end_date, date(2024, 6, 15));

    let fetched = repo.get_by_id(created.id).await.unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.listing_id, listing_id);
    assert_eq!(fetched.cancellable_until, created.cancellable_until);
}

#[tokio::test]
async fn overlap_returns_none() {
    let repo = setup().await;
    let listing_id = Uuid::new_v4();

    repo.create_if_available(booking_for(listing_id, date(2024, 6, 10), date(2024, 6, 15)))
        .await
        .unwrap()
        .expect("first booking");

    // Overlapping range on the same listing is refused.
    let refused = repo
        .create_if_available(booking_for(listing_id, date(2024, 6, 12), date(2024, 6, 20)))
        .await
        .unwrap();
    assert!(refused.is_none());

    // Same range on a different listing is fine.
    let other = repo
        .create_if_available(booking_for(
            Uuid::new_v4(),
            date(2024, 6, 12),
            date(2024, 6, 20),
        ))
        .await
        .unwrap();
    assert!(other.is_some());
}

#[tokio::test]
async fn half_open_ranges_do_not_collide_at_the_boundary() {
    let repo = setup().await;
    let listing_id = Uuid::new_v4();

    repo.create_if_available(booking_for(listing_id, date(2024, 6, 10), date(2024, 6, 15)))
        .await
        .unwrap()
        .expect("first booking");

    let adjacent = repo
        .create_if_available(booking_for(listing_id, date(2024, 6, 15), date(2024, 6, 20)))
        .await
        .unwrap();
    assert!(adjacent.is_some());
}

#[tokio::test]
async fn terminal_bookings_do_not_block() {
    let repo = setup().await;
    let listing_id = Uuid::new_v4();

    let first = repo
        .create_if_available(booking_for(listing_id, date(2024, 6, 10), date(2024, 6, 15)))
        .await
        .unwrap()
        .expect("first booking");

    repo.set_status(first.id, BookingStatus::Cancelled)
        .await
        .unwrap();

    let second = repo
        .create_if_available(booking_for(listing_id, date(2024, 6, 10), date(2024, 6, 15)))
        .await
        .unwrap();
    assert!(second.is_some());
}

#[tokio::test]
async fn has_checked_booking_tracks_status() {
    let repo = setup().await;
    let listing_id = Uuid::new_v4();
    let input = booking_for(listing_id, date(2024, 6, 10), date(2024, 6, 15));
    let tenant_id = input.tenant_id;

    let booking = repo
        .create_if_available(input)
        .await
        .unwrap()
        .expect("dates are free");

    assert!(!repo.has_checked_booking(tenant_id, listing_id).await.unwrap());

    repo.set_status(booking.id, BookingStatus::Checked)
        .await
        .unwrap();

    assert!(repo.has_checked_booking(tenant_id, listing_id).await.unwrap());
    // Another tenant is still ineligible.
    assert!(
        !repo
            .has_checked_booking(Uuid::new_v4(), listing_id)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn lists_filter_by_party() {
    let repo = setup().await;
    let listing_id = Uuid::new_v4();
    let input = booking_for(listing_id, date(2024, 6, 10), date(2024, 6, 15));
    let tenant_id = input.tenant_id;
    let landlord_id = input.landlord_id;

    repo.create_if_available(input)
        .await
        .unwrap()
        .expect("dates are free");
    repo.create_if_available(booking_for(
        Uuid::new_v4(),
        date(2024, 6, 10),
        date(2024, 6, 15),
    ))
    .await
    .unwrap()
    .expect("different listing");

    let all = repo.list_all(Pagination::default()).await.unwrap();
    assert_eq!(all.total, 2);

    let by_tenant = repo
        .list_by_tenant(tenant_id, Pagination::default())
        .await
        .unwrap();
    assert_eq!(by_tenant.total, 1);

    let by_landlord = repo
        .list_by_landlord(landlord_id, Pagination::default())
        .await
        .unwrap();
    assert_eq!(by_landlord.total, 1);
}

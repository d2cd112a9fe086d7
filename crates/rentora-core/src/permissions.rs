//! Role/permission predicates.
//!
//! Pure functions mapping (actor, resource, action) to allow/deny. The
//! services call these before touching a repository; none of them perform
//! I/O.

use uuid::Uuid;

use crate::models::booking::Booking;
use crate::models::listing::Listing;
use crate::models::user::{Role, User};

/// Administrators hold every permission checked here.
pub fn is_admin(actor: &User) -> bool {
    actor.role == Role::Administrator
}

/// Only tenants book listings; administrators may act on their behalf.
pub fn can_create_booking(actor: &User) -> bool {
    is_admin(actor) || actor.role == Role::Tenant
}

/// A booking is visible to the administrator, the owning tenant, and the
/// landlord of the booked listing.
pub fn can_access_booking(actor: &User, booking: &Booking) -> bool {
    if is_admin(actor) {
        return true;
    }
    match actor.role {
        Role::Tenant => booking.tenant_id == actor.id,
        Role::Landlord => booking.landlord_id == actor.id,
        Role::Administrator => true,
    }
}

/// Listings may be created by landlords (and administrators).
pub fn can_create_listing(actor: &User) -> bool {
    is_admin(actor) || actor.role == Role::Landlord
}

/// A listing may be modified or deleted only by its owning landlord or an
/// administrator.
pub fn can_modify_listing(actor: &User, listing: &Listing) -> bool {
    is_admin(actor) || (actor.role == Role::Landlord && listing.landlord_id == actor.id)
}

/// Reviews come from tenants only — eligibility (a completed stay) is
/// checked separately against the booking history.
pub fn can_review(actor: &User) -> bool {
    actor.role == Role::Tenant
}

/// User records may be read or modified by the administrator or the account
/// owner themselves.
pub fn can_manage_user(actor: &User, target_id: Uuid) -> bool {
    is_admin(actor) || actor.id == target_id
}

//! Pure booking transition rules.
//!
//! States: `pending → {confirmed, rejected, cancelled}`;
//! `confirmed → {cancelled, checked}`; `checked`, `rejected` and
//! `cancelled` are terminal. Every check here is a pure function of the
//! booking, the actor, the requested status, and today's date.

use chrono::NaiveDate;
use rentora_core::models::booking::{Booking, BookingStatus};
use rentora_core::models::user::{Role, User};

use crate::error::BookingError;

/// Deployment knobs for transition checking.
#[derive(Debug, Clone, Default)]
pub struct TransitionPolicy {
    /// Administrators always bypass the role requirements; whether they
    /// also bypass the `CancellationExpired` / `TooEarly` date guards is a
    /// deployment decision. Off by default.
    pub admin_bypasses_date_guards: bool,
}

/// Validate a requested status transition.
///
/// Checks, in order: terminal state, transition-table membership, actor
/// role/ownership, and the date guard attached to the edge (if any).
pub fn check_transition(
    booking: &Booking,
    actor: &User,
    new_status: BookingStatus,
    today: NaiveDate,
    policy: &TransitionPolicy,
) -> Result<(), BookingError> {
    if booking.status.is_terminal() {
        return Err(BookingError::TerminalState {
            status: booking.status,
        });
    }

    let is_admin = actor.role == Role::Administrator;
    let guard_exempt = is_admin && policy.admin_bypasses_date_guards;

    match (booking.status, new_status) {
        (BookingStatus::Pending, BookingStatus::Confirmed)
        | (BookingStatus::Pending, BookingStatus::Rejected) => {
            require_listing_landlord(booking, actor, is_admin)
        }
        (BookingStatus::Pending, BookingStatus::Cancelled) => {
            require_owning_tenant(booking, actor, is_admin)
        }
        (BookingStatus::Confirmed, BookingStatus::Cancelled) => {
            require_owning_tenant(booking, actor, is_admin)?;
            if today > booking.cancellable_until && !guard_exempt {
                return Err(BookingError::CancellationExpired);
            }
            Ok(())
        }
        (BookingStatus::Confirmed, BookingStatus::Checked) => {
            require_listing_landlord(booking, actor, is_admin)?;
            if today < booking.start_date && !guard_exempt {
                return Err(BookingError::TooEarly);
            }
            Ok(())
        }
        (from, to) => Err(BookingError::InvalidTransition { from, to }),
    }
}

fn require_listing_landlord(
    booking: &Booking,
    actor: &User,
    is_admin: bool,
) -> Result<(), BookingError> {
    if is_admin || (actor.role == Role::Landlord && actor.id == booking.landlord_id) {
        Ok(())
    } else {
        Err(BookingError::Unauthorized {
            reason: "only the landlord of the listing may do this".into(),
        })
    }
}

fn require_owning_tenant(
    booking: &Booking,
    actor: &User,
    is_admin: bool,
) -> Result<(), BookingError> {
    if is_admin || (actor.role == Role::Tenant && actor.id == booking.tenant_id) {
        Ok(())
    } else {
        Err(BookingError::Unauthorized {
            reason: "only the tenant who made the booking may do this".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn user(id: Uuid, role: Role) -> User {
        User {
            id,
            username: "u".into(),
            first_name: String::new(),
            last_name: String::new(),
            email: "u@example.com".into(),
            password_hash: String::new(),
            role,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    struct Fixture {
        booking: Booking,
        tenant: User,
        landlord: User,
        admin: User,
    }

    fn fixture(status: BookingStatus) -> Fixture {
        let tenant = user(Uuid::new_v4(), Role::Tenant);
        let landlord = user(Uuid::new_v4(), Role::Landlord);
        let admin = user(Uuid::new_v4(), Role::Administrator);
        let booking = Booking {
            id: Uuid::new_v4(),
            listing_id: Uuid::new_v4(),
            landlord_id: landlord.id,
            tenant_id: tenant.id,
            start_date: date(2024, 6, 10),
            end_date: date(2024, 6, 15),
            status,
            cancellable_until: date(2024, 6, 8),
            created_at: Utc::now(),
        };
        Fixture {
            booking,
            tenant,
            landlord,
            admin,
        }
    }

    fn default_policy() -> TransitionPolicy {
        TransitionPolicy::default()
    }

    #[test]
    fn landlord_confirms_pending() {
        let f = fixture(BookingStatus::Pending);
        let result = check_transition(
            &f.booking,
            &f.landlord,
            BookingStatus::Confirmed,
            date(2024, 6, 1),
            &default_policy(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn landlord_rejects_pending() {
        let f = fixture(BookingStatus::Pending);
        assert!(
            check_transition(
                &f.booking,
                &f.landlord,
                BookingStatus::Rejected,
                date(2024, 6, 1),
                &default_policy(),
            )
            .is_ok()
        );
    }

    #[test]
    fn tenant_cannot_confirm() {
        let f = fixture(BookingStatus::Pending);
        let err = check_transition(
            &f.booking,
            &f.tenant,
            BookingStatus::Confirmed,
            date(2024, 6, 1),
            &default_policy(),
        )
        .unwrap_err();
        assert!(matches!(err, BookingError::Unauthorized { .. }));
    }

    #[test]
    fn foreign_landlord_cannot_confirm() {
        let f = fixture(BookingStatus::Pending);
        let other = user(Uuid::new_v4(), Role::Landlord);
        let err = check_transition(
            &f.booking,
            &other,
            BookingStatus::Confirmed,
            date(2024, 6, 1),
            &default_policy(),
        )
        .unwrap_err();
        assert!(matches!(err, BookingError::Unauthorized { .. }));
    }

    #[test]
    fn tenant_cancels_pending() {
        let f = fixture(BookingStatus::Pending);
        assert!(
            check_transition(
                &f.booking,
                &f.tenant,
                BookingStatus::Cancelled,
                date(2024, 6, 9),
                &default_policy(),
            )
            .is_ok()
        );
    }

    #[test]
    fn tenant_cancels_confirmed_within_deadline() {
        let f = fixture(BookingStatus::Confirmed);
        // cancellable_until is 6/08: on the day itself it still works.
        assert!(
            check_transition(
                &f.booking,
                &f.tenant,
                BookingStatus::Cancelled,
                date(2024, 6, 8),
                &default_policy(),
            )
            .is_ok()
        );
    }

    #[test]
    fn cancellation_after_deadline_fails() {
        let f = fixture(BookingStatus::Confirmed);
        let err = check_transition(
            &f.booking,
            &f.tenant,
            BookingStatus::Cancelled,
            date(2024, 6, 9),
            &default_policy(),
        )
        .unwrap_err();
        assert!(matches!(err, BookingError::CancellationExpired));
    }

    #[test]
    fn checked_before_start_fails() {
        let f = fixture(BookingStatus::Confirmed);
        let err = check_transition(
            &f.booking,
            &f.landlord,
            BookingStatus::Checked,
            date(2024, 6, 9),
            &default_policy(),
        )
        .unwrap_err();
        assert!(matches!(err, BookingError::TooEarly));
    }

    #[test]
    fn checked_on_start_date_succeeds() {
        let f = fixture(BookingStatus::Confirmed);
        assert!(
            check_transition(
                &f.booking,
                &f.landlord,
                BookingStatus::Checked,
                date(2024, 6, 10),
                &default_policy(),
            )
            .is_ok()
        );
    }

    #[test]
    fn terminal_states_refuse_everything() {
        for status in [
            BookingStatus::Checked,
            BookingStatus::Rejected,
            BookingStatus::Cancelled,
        ] {
            let f = fixture(status);
            let err = check_transition(
                &f.booking,
                &f.admin,
                BookingStatus::Pending,
                date(2024, 6, 20),
                &default_policy(),
            )
            .unwrap_err();
            assert!(matches!(err, BookingError::TerminalState { .. }));
        }
    }

    #[test]
    fn self_loop_is_invalid() {
        let f = fixture(BookingStatus::Pending);
        let err = check_transition(
            &f.booking,
            &f.landlord,
            BookingStatus::Pending,
            date(2024, 6, 1),
            &default_policy(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            BookingError::InvalidTransition {
                from: BookingStatus::Pending,
                to: BookingStatus::Pending,
            }
        ));
    }

    #[test]
    fn pending_to_checked_is_invalid() {
        let f = fixture(BookingStatus::Pending);
        let err = check_transition(
            &f.booking,
            &f.landlord,
            BookingStatus::Checked,
            date(2024, 6, 12),
            &default_policy(),
        )
        .unwrap_err();
        assert!(matches!(err, BookingError::InvalidTransition { .. }));
    }

    #[test]
    fn admin_bypasses_role_but_not_date_guards() {
        let f = fixture(BookingStatus::Confirmed);
        // Role check bypassed: admin may cancel someone else's booking...
        // ...but the deadline guard still applies by default.
        let err = check_transition(
            &f.booking,
            &f.admin,
            BookingStatus::Cancelled,
            date(2024, 6, 9),
            &default_policy(),
        )
        .unwrap_err();
        assert!(matches!(err, BookingError::CancellationExpired));

        // Within the deadline the admin succeeds without being the tenant.
        assert!(
            check_transition(
                &f.booking,
                &f.admin,
                BookingStatus::Cancelled,
                date(2024, 6, 7),
                &default_policy(),
            )
            .is_ok()
        );
    }

    #[test]
    fn policy_can_exempt_admin_from_date_guards() {
        let f = fixture(BookingStatus::Confirmed);
        let policy = TransitionPolicy {
            admin_bypasses_date_guards: true,
        };
        assert!(
            check_transition(
                &f.booking,
                &f.admin,
                BookingStatus::Cancelled,
                date(2024, 6, 9),
                &policy,
            )
            .is_ok()
        );
        // Non-admins get no exemption from the policy.
        let err = check_transition(
            &f.booking,
            &f.tenant,
            BookingStatus::Cancelled,
            date(2024, 6, 9),
            &policy,
        )
        .unwrap_err();
        assert!(matches!(err, BookingError::CancellationExpired));
    }
}

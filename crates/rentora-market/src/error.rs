//! Booking validation and transition errors.

use rentora_core::error::RentoraError;
use rentora_core::models::booking::BookingStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("end date must not be earlier than start date")]
    InvalidRange,

    #[error("the listing is already booked for the requested dates")]
    Overlap,

    #[error("field `{field}` is immutable after creation; only `status` may be updated")]
    ImmutableField { field: &'static str },

    #[error("cannot transition booking from `{}` to `{}`", from.as_str(), to.as_str())]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("booking is in terminal state `{}` and cannot change", status.as_str())]
    TerminalState { status: BookingStatus },

    #[error("the cancellation deadline for this booking has passed")]
    CancellationExpired,

    #[error("the stay cannot be marked checked before its start date")]
    TooEarly,

    #[error("not allowed: {reason}")]
    Unauthorized { reason: String },
}

impl From<BookingError> for RentoraError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Unauthorized { reason } => RentoraError::AuthorizationDenied { reason },
            other => RentoraError::Validation {
                message: other.to_string(),
            },
        }
    }
}

//! Authentication error types.

use rentora_core::error::RentoraError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("account is inactive")]
    AccountInactive,

    #[error("session expired")]
    SessionExpired,

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("password policy violation: {0}")]
    PasswordPolicy(String),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for RentoraError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::AccountInactive
            | AuthError::SessionExpired
            | AuthError::TokenExpired
            | AuthError::TokenInvalid(_) => RentoraError::AuthenticationFailed {
                reason: err.to_string(),
            },
            AuthError::PasswordPolicy(msg) => RentoraError::Validation { message: msg },
            AuthError::Crypto(msg) => RentoraError::Crypto(msg),
        }
    }
}

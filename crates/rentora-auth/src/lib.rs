//! Rentora Auth — password authentication, JWT issuance/validation, and
//! the per-request session refresh interceptor.

pub mod config;
pub mod error;
pub mod interceptor;
pub mod password;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use interceptor::{RequestSession, SessionRefreshInterceptor};
pub use service::{AuthService, LoginInput, LoginOutput};
pub use token::Claims;

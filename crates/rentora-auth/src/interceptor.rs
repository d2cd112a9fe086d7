//! Session refresh interceptor.
//!
//! Runs once per inbound request before the handler, and once after to
//! attach a refreshed cookie. The HTTP framing itself is the caller's
//! concern: the interceptor consumes raw cookie values and emits cookie
//! writes, so any request layer can wrap it.

use chrono::Utc;
use cookie::time::{Duration as CookieDuration, OffsetDateTime};
use cookie::{Cookie, SameSite};
use rentora_core::repository::RevokedTokenRepository;
use tracing::debug;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::token::{self, IssuedToken, TokenKind};

/// Name of the access token cookie.
pub const ACCESS_COOKIE: &str = "access";
/// Name of the refresh token cookie.
pub const REFRESH_COOKIE: &str = "refresh";

/// Body detail for the 401 emitted when the refresh token is dead.
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please log in again.";

/// Per-request outcome of the pre-handler pass.
#[derive(Debug, Default)]
pub struct RequestSession {
    /// Bearer credential the handler should authenticate with, if any.
    bearer: Option<String>,
    /// Access token minted during this request, to be written back as a
    /// cookie after the handler runs.
    minted: Option<IssuedToken>,
}

impl RequestSession {
    /// Anonymous request: no usable credential.
    fn anonymous() -> Self {
        Self::default()
    }

    fn with_bearer(token: String) -> Self {
        Self {
            bearer: Some(token),
            minted: None,
        }
    }

    fn with_minted(issued: IssuedToken) -> Self {
        Self {
            bearer: Some(issued.token.clone()),
            minted: Some(issued),
        }
    }

    /// The bearer credential for the request, if authenticated.
    pub fn bearer(&self) -> Option<&str> {
        self.bearer.as_deref()
    }

    /// Access token minted during this request, if any.
    pub fn minted(&self) -> Option<&IssuedToken> {
        self.minted.as_ref()
    }
}

/// Inspects and refreshes the session cookies around each request.
///
/// The only shared state is the refresh-token revocation list consulted
/// when minting.
pub struct SessionRefreshInterceptor<B: RevokedTokenRepository> {
    blacklist: B,
    config: AuthConfig,
}

impl<B: RevokedTokenRepository> SessionRefreshInterceptor<B> {
    pub fn new(blacklist: B, config: AuthConfig) -> Self {
        Self { blacklist, config }
    }

    /// Pre-handler pass over the `access` and `refresh` cookie values.
    ///
    /// - A present, non-expiring access token is used as-is.
    /// - An expiring or absent access token is replaced by one minted from
    ///   the refresh token when that is present; a dead refresh token fails
    ///   with [`AuthError::SessionExpired`], which must short-circuit the
    ///   handler with a 401 and clear both cookies.
    /// - With no usable credential the request proceeds unauthenticated and
    ///   downstream authorization decides.
    pub async fn on_request(
        &self,
        access: Option<&str>,
        refresh: Option<&str>,
    ) -> Result<RequestSession, AuthError> {
        match (access, refresh) {
            (Some(access), refresh) => {
                if self.is_access_expiring(access) {
                    if let Some(refresh) = refresh {
                        let minted = self.mint_access(refresh).await?;
                        debug!("access token refreshed");
                        return Ok(RequestSession::with_minted(minted));
                    }
                }
                // Not expiring, or nothing to refresh with: keep the
                // existing credential and let downstream validation decide.
                Ok(RequestSession::with_bearer(access.to_owned()))
            }
            (None, Some(refresh)) => {
                let minted = self.mint_access(refresh).await?;
                debug!("access token minted from refresh cookie");
                Ok(RequestSession::with_minted(minted))
            }
            (None, None) => Ok(RequestSession::anonymous()),
        }
    }

    /// Post-handler pass: the cookie write carrying a newly minted access
    /// token, if one was minted in [`Self::on_request`].
    pub fn on_response(&self, session: &RequestSession) -> Option<Cookie<'static>> {
        session
            .minted
            .as_ref()
            .map(|issued| auth_cookie(ACCESS_COOKIE, &issued.token, issued.expires_at))
    }

    /// Whether the access token expires within the refresh window.
    ///
    /// Malformed or undecodable tokens count as expiring — failing toward
    /// refresh is safe because minting re-verifies everything.
    fn is_access_expiring(&self, access: &str) -> bool {
        match token::decode_token(access, TokenKind::Access, &self.config) {
            Ok(claims) => {
                let now = Utc::now().timestamp();
                claims.exp <= now + self.config.refresh_window_secs as i64
            }
            Err(_) => true,
        }
    }

    /// Mint a new access token from a refresh token.
    ///
    /// Any failure — bad signature, expiry, wrong kind, or a blacklisted
    /// jti — collapses to [`AuthError::SessionExpired`].
    async fn mint_access(&self, refresh: &str) -> Result<IssuedToken, AuthError> {
        let claims = token::decode_token(refresh, TokenKind::Refresh, &self.config)
            .map_err(|_| AuthError::SessionExpired)?;

        let revoked = self
            .blacklist
            .is_revoked(&claims.jti)
            .await
            .map_err(|e| AuthError::TokenInvalid(format!("blacklist lookup failed: {e}")))?;
        if revoked {
            return Err(AuthError::SessionExpired);
        }

        let user_id = claims.user_id().map_err(|_| AuthError::SessionExpired)?;
        token::issue_access_token(user_id, claims.role, &self.config)
    }
}

/// Build an auth cookie write: HttpOnly, Secure, SameSite=Lax, expiring
/// exactly when the token it carries does.
pub fn auth_cookie(
    name: &'static str,
    token: &str,
    expires_at: chrono::DateTime<Utc>,
) -> Cookie<'static> {
    let expires = OffsetDateTime::from_unix_timestamp(expires_at.timestamp())
        .unwrap_or(OffsetDateTime::UNIX_EPOCH);
    Cookie::build((name, token.to_owned()))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .expires(expires)
        .build()
}

/// Removal writes for both auth cookies, used on logout and when a dead
/// refresh token forces the session-expired response.
pub fn clear_auth_cookies() -> [Cookie<'static>; 2] {
    [removal_cookie(ACCESS_COOKIE), removal_cookie(REFRESH_COOKIE)]
}

fn removal_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .expires(OffsetDateTime::UNIX_EPOCH)
        .max_age(CookieDuration::ZERO)
        .build()
}

/// JSON body of the 401 session-expired response.
pub fn session_expired_body() -> serde_json::Value {
    serde_json::json!({ "detail": SESSION_EXPIRED_MESSAGE })
}

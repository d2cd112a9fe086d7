//! Authentication service — login, logout, and password change
//! orchestration.

use rentora_core::error::{RentoraError, RentoraResult};
use rentora_core::models::revoked_token::CreateRevokedToken;
use rentora_core::models::user::Role;
use rentora_core::repository::{RevokedTokenRepository, UserRepository};
use tracing::debug;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token::{self, IssuedToken, TokenKind};

/// Input for the login flow.
#[derive(Debug)]
pub struct LoginInput {
    pub username_or_email: String,
    pub password: String,
}

/// Successful login result: a fresh token pair plus the authenticated
/// identity. Each token carries the expiry to use for its cookie.
#[derive(Debug)]
pub struct LoginOutput {
    pub access: IssuedToken,
    pub refresh: IssuedToken,
    pub user_id: Uuid,
    pub role: Role,
}

/// Authentication service.
///
/// Generic over repository implementations so that the auth layer has no
/// dependency on the database crate.
pub struct AuthService<U: UserRepository, B: RevokedTokenRepository> {
    user_repo: U,
    blacklist: B,
    config: AuthConfig,
}

impl<U: UserRepository, B: RevokedTokenRepository> AuthService<U, B> {
    pub fn new(user_repo: U, blacklist: B, config: AuthConfig) -> Self {
        Self {
            user_repo,
            blacklist,
            config,
        }
    }

    /// Authenticate with username/email + password and issue a token pair.
    pub async fn login(&self, input: LoginInput) -> RentoraResult<LoginOutput> {
        // 1. Look up user — try username first, then email.
        let user = match self
            .user_repo
            .get_by_username(&input.username_or_email)
            .await
        {
            Ok(u) => u,
            Err(RentoraError::NotFound { .. }) => self
                .user_repo
                .get_by_email(&input.username_or_email)
                .await
                .map_err(|_| AuthError::InvalidCredentials)?,
            Err(e) => return Err(e),
        };

        // 2. Verify password.
        let valid = password::verify_password(
            &input.password,
            &user.password_hash,
            self.config.pepper.as_deref(),
        )?;
        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        // 3. Deactivated accounts cannot log in.
        if !user.is_active {
            return Err(AuthError::AccountInactive.into());
        }

        // 4. Issue both tokens.
        let access = token::issue_access_token(user.id, user.role, &self.config)?;
        let refresh = token::issue_refresh_token(user.id, user.role, &self.config)?;

        debug!(user_id = %user.id, role = user.role.as_str(), "login succeeded");

        Ok(LoginOutput {
            access,
            refresh,
            user_id: user.id,
            role: user.role,
        })
    }

    /// Revoke a refresh token (logout).
    ///
    /// An absent or already-expired token is a successful no-op — there is
    /// nothing left to revoke and the caller clears the cookies regardless.
    pub async fn logout(&self, refresh_token: Option<&str>) -> RentoraResult<()> {
        let Some(raw) = refresh_token else {
            return Ok(());
        };

        let claims = match token::decode_token(raw, TokenKind::Refresh, &self.config) {
            Ok(c) => c,
            Err(AuthError::TokenExpired) => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        let user_id = claims.user_id()?;
        self.blacklist
            .revoke(CreateRevokedToken {
                jti: claims.jti.clone(),
                user_id,
                expires_at: claims.expires_at(),
            })
            .await?;

        debug!(user_id = %user_id, "refresh token revoked");
        Ok(())
    }

    /// Change a user's password after re-verifying the current one.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        old_password: &str,
        new_password: &str,
    ) -> RentoraResult<()> {
        let user = self.user_repo.get_by_id(user_id).await?;

        let valid = password::verify_password(
            old_password,
            &user.password_hash,
            self.config.pepper.as_deref(),
        )?;
        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        password::check_policy(new_password, &self.config)?;
        self.user_repo.set_password(user_id, new_password).await
    }
}

/// Hosted auth provider abstraction
///
/// Credentials are never stored here: every call is forwarded to the provider
/// and only the resulting session is kept (see `services::sessions`).
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppResult;

pub mod gotrue;

pub use gotrue::GoTrueAuthProvider;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// An authenticated session issued by the provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: AuthUser,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait AuthProvider: Send + Sync {
    /// Registers an account. Returns a session unless email confirmation is pending.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        username: Option<String>,
    ) -> AppResult<Option<Session>>;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> AppResult<Session>;

    /// Resolves a username to the account email through the profiles table
    async fn email_for_username(&self, username: &str) -> AppResult<Option<String>>;

    /// URL the browser is sent to for an OAuth sign-in
    fn oauth_authorize_url(&self, provider: &str) -> AppResult<String>;

    async fn sign_out(&self, access_token: &str) -> AppResult<()>;

    async fn reset_password(&self, email: &str) -> AppResult<()>;

    async fn update_password(&self, access_token: &str, new_password: &str) -> AppResult<()>;

    /// The user an access token belongs to; fails if the token is not valid
    async fn user(&self, access_token: &str) -> AppResult<AuthUser>;
}

/// Sign-in flow on top of an `AuthProvider`
#[derive(Clone)]
pub struct AuthService {
    provider: Arc<dyn AuthProvider>,
}

impl AuthService {
    pub fn new(provider: Arc<dyn AuthProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &Arc<dyn AuthProvider> {
        &self.provider
    }

    /// Builds a session around a token issued elsewhere (an OAuth redirect).
    ///
    /// The token is checked with the provider before it is trusted.
    pub async fn adopt(
        &self,
        access_token: &str,
        refresh_token: Option<String>,
        expires_in: Option<u64>,
    ) -> AppResult<Session> {
        let user = self.provider.user(access_token).await?;
        tracing::info!(user_id = %user.id, "Adopted externally issued session");

        Ok(Session {
            access_token: access_token.to_string(),
            refresh_token,
            expires_in,
            user,
        })
    }

    /// Signs in with an email or a username.
    ///
    /// The input is tried as an email first. If that fails and the input has
    /// no `@`, it is looked up as a username and the sign-in is retried with
    /// the resolved email. A failed lookup keeps the original error.
    pub async fn sign_in(&self, email_or_username: &str, password: &str) -> AppResult<Session> {
        let original_error = match self
            .provider
            .sign_in_with_password(email_or_username, password)
            .await
        {
            Ok(session) => return Ok(session),
            Err(e) => e,
        };

        if email_or_username.contains('@') {
            return Err(original_error);
        }

        match self.provider.email_for_username(email_or_username).await {
            Ok(Some(email)) => {
                tracing::debug!(username = %email_or_username, "Retrying sign-in with profile email");
                self.provider.sign_in_with_password(&email, password).await
            }
            Ok(None) => Err(original_error),
            Err(e) => {
                tracing::error!(error = %e, "Username lookup failed");
                Err(original_error)
            }
        }
    }
}

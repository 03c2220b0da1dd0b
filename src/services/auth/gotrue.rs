/// GoTrue-compatible auth provider (the hosted backend's auth REST API)
///
/// Endpoints used:
/// - `POST /auth/v1/signup`, `POST /auth/v1/token?grant_type=password`
/// - `POST /auth/v1/logout`, `POST /auth/v1/recover`
/// - `GET /auth/v1/user` (token check), `PUT /auth/v1/user` (password change)
/// - `GET /auth/v1/authorize?provider=...` (browser redirect only)
/// - `GET /rest/v1/profiles?username=eq.{name}` for username sign-in
use reqwest::{Client as HttpClient, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::json;

use super::{AuthProvider, AuthUser, Session};
use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct GoTrueAuthProvider {
    http_client: HttpClient,
    base_url: String,
    anon_key: String,
    site_url: String,
}

/// Sign-up responds with a session when autoconfirm is on, a bare user otherwise
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(Session),
    User(serde_json::Value),
}

#[derive(Debug, Deserialize)]
struct ProfileRow {
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default, alias = "error_description", alias = "msg")]
    message: Option<String>,
}

impl GoTrueAuthProvider {
    pub fn new(base_url: String, anon_key: String, site_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
            site_url,
        }
    }

    fn auth_endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    /// Attaches the anon key, and the user's token when acting on their behalf
    fn authorized(&self, request: RequestBuilder, access_token: Option<&str>) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token.unwrap_or(self.anon_key.as_str()))
    }

    /// Maps non-2xx responses to errors, keeping the provider's message
    async fn check(response: Response) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or(body);

        tracing::warn!(status = %status, message = %message, "Auth provider request failed");

        Err(match status {
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                AppError::Unauthorized(message)
            }
            StatusCode::UNPROCESSABLE_ENTITY => AppError::InvalidInput(message),
            _ => AppError::ExternalApi(format!("Auth provider returned {}: {}", status, message)),
        })
    }
}

#[async_trait::async_trait]
impl AuthProvider for GoTrueAuthProvider {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        username: Option<String>,
    ) -> AppResult<Option<Session>> {
        let request = self
            .http_client
            .post(self.auth_endpoint("signup"))
            .query(&[("redirect_to", self.site_url.as_str())])
            .json(&json!({
                "email": email,
                "password": password,
                "data": {
                    "username": username,
                    "full_name": username,
                }
            }));

        let response = Self::check(self.authorized(request, None).send().await?).await?;

        match response.json::<SignUpResponse>().await? {
            SignUpResponse::Session(session) => {
                tracing::info!(user_id = %session.user.id, "Signed up");
                Ok(Some(session))
            }
            SignUpResponse::User(_) => {
                tracing::info!("Signed up, awaiting email confirmation");
                Ok(None)
            }
        }
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> AppResult<Session> {
        let request = self
            .http_client
            .post(self.auth_endpoint("token"))
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }));

        let response = Self::check(self.authorized(request, None).send().await?).await?;
        let session: Session = response.json().await?;

        tracing::info!(user_id = %session.user.id, "Signed in");
        Ok(session)
    }

    async fn email_for_username(&self, username: &str) -> AppResult<Option<String>> {
        let filter = format!("eq.{}", username);
        let request = self
            .http_client
            .get(format!("{}/rest/v1/profiles", self.base_url))
            .query(&[("select", "email"), ("username", filter.as_str())]);

        let response = Self::check(self.authorized(request, None).send().await?).await?;
        let rows: Vec<ProfileRow> = response.json().await?;

        Ok(rows.into_iter().next().and_then(|row| row.email))
    }

    fn oauth_authorize_url(&self, provider: &str) -> AppResult<String> {
        let url = Url::parse_with_params(
            &self.auth_endpoint("authorize"),
            &[("provider", provider), ("redirect_to", self.site_url.as_str())],
        )
        .map_err(|e| AppError::Internal(format!("Invalid auth URL: {}", e)))?;

        Ok(url.to_string())
    }

    async fn sign_out(&self, access_token: &str) -> AppResult<()> {
        let request = self.http_client.post(self.auth_endpoint("logout"));
        Self::check(self.authorized(request, Some(access_token)).send().await?).await?;
        Ok(())
    }

    async fn reset_password(&self, email: &str) -> AppResult<()> {
        let request = self
            .http_client
            .post(self.auth_endpoint("recover"))
            .json(&json!({ "email": email }));
        Self::check(self.authorized(request, None).send().await?).await?;
        Ok(())
    }

    async fn update_password(&self, access_token: &str, new_password: &str) -> AppResult<()> {
        let request = self
            .http_client
            .put(self.auth_endpoint("user"))
            .json(&json!({ "password": new_password }));
        Self::check(self.authorized(request, Some(access_token)).send().await?).await?;
        Ok(())
    }

    async fn user(&self, access_token: &str) -> AppResult<AuthUser> {
        let request = self.http_client.get(self.auth_endpoint("user"));
        let response =
            Self::check(self.authorized(request, Some(access_token)).send().await?).await?;
        Ok(response.json().await?)
    }
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{error::AppResult, services::Session};

use super::{extract::AccessToken, AppState};

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    /// Email address or username
    #[serde(alias = "email", alias = "username")]
    pub login: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePasswordRequest {
    pub password: String,
}

/// Tokens the browser received from an OAuth redirect
#[derive(Debug, Default, Deserialize)]
pub struct AdoptSessionRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session: Option<Session>,
    /// Saved items loaded into the session's list
    pub saved_items: usize,
    pub confirmation_required: bool,
}

pub async fn sign_up(
    State(state): State<AppState>,
    Json(request): Json<SignUpRequest>,
) -> AppResult<(StatusCode, Json<SessionResponse>)> {
    let session = state
        .auth
        .provider()
        .sign_up(&request.email, &request.password, request.username)
        .await?;

    let response = match session {
        Some(session) => {
            let list = state.sessions.establish(&session).await;
            SessionResponse {
                saved_items: list.cached_len(),
                session: Some(session),
                confirmation_required: false,
            }
        }
        None => SessionResponse {
            session: None,
            saved_items: 0,
            confirmation_required: true,
        },
    };

    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> AppResult<Json<SessionResponse>> {
    let session = state.auth.sign_in(&request.login, &request.password).await?;
    let list = state.sessions.establish(&session).await;

    Ok(Json(SessionResponse {
        saved_items: list.cached_len(),
        session: Some(session),
        confirmation_required: false,
    }))
}

/// Registers a bearer token issued by the provider outside this API (OAuth).
///
/// The token is validated with the provider, then gets its own list like a
/// password sign-in would.
pub async fn adopt_session(
    State(state): State<AppState>,
    token: AccessToken,
    Json(request): Json<AdoptSessionRequest>,
) -> AppResult<Json<SessionResponse>> {
    let token = token.require()?;
    let session = state
        .auth
        .adopt(token, request.refresh_token, request.expires_in)
        .await?;
    let list = state.sessions.establish(&session).await;

    Ok(Json(SessionResponse {
        saved_items: list.cached_len(),
        session: Some(session),
        confirmation_required: false,
    }))
}

/// Ends the local session even when the provider call fails
pub async fn sign_out(State(state): State<AppState>, token: AccessToken) -> AppResult<StatusCode> {
    let token = token.require()?;

    if let Err(e) = state.auth.provider().sign_out(token).await {
        tracing::warn!(error = %e, "Provider sign-out failed, dropping local session anyway");
    }
    state.sessions.teardown(token).await;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> AppResult<StatusCode> {
    state.auth.provider().reset_password(&request.email).await?;
    Ok(StatusCode::ACCEPTED)
}

pub async fn update_password(
    State(state): State<AppState>,
    token: AccessToken,
    Json(request): Json<UpdatePasswordRequest>,
) -> AppResult<StatusCode> {
    let token = token.require()?;
    state
        .auth
        .provider()
        .update_password(token, &request.password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Where to send the browser for an OAuth sign-in
pub async fn oauth(
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> AppResult<Json<Value>> {
    let url = state.auth.provider().oauth_authorize_url(&provider)?;
    Ok(Json(json!({ "url": url })))
}

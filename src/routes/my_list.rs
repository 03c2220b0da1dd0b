use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    models::{ContentKind, NewSavedItem, Notification, SavedItem},
    services::{ListMutation, MutationOutcome},
};

use super::{extract::AccessToken, AppState};

#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub notification: Notification,
    pub in_list: bool,
}

fn status_for(outcome: MutationOutcome) -> StatusCode {
    match outcome {
        MutationOutcome::Applied => StatusCode::OK,
        MutationOutcome::Refused => StatusCode::UNAUTHORIZED,
        MutationOutcome::Failed => StatusCode::BAD_GATEWAY,
    }
}

fn respond(mutation: ListMutation, in_list: bool) -> (StatusCode, Json<MutationResponse>) {
    (
        status_for(mutation.outcome),
        Json(MutationResponse {
            notification: mutation.notification,
            in_list,
        }),
    )
}

/// Saved rows, newest first
pub async fn index(
    State(state): State<AppState>,
    token: AccessToken,
) -> AppResult<Json<Vec<SavedItem>>> {
    let list = state.sessions.list_for(token.as_deref()).await;
    Ok(Json(list.items().await?))
}

/// Membership from the session cache; false without a session
pub async fn membership(
    State(state): State<AppState>,
    token: AccessToken,
    Path((kind, id)): Path<(ContentKind, u64)>,
) -> Json<Value> {
    let list = state.sessions.list_for(token.as_deref()).await;
    Json(json!({ "in_list": list.is_member(id, kind) }))
}

pub async fn add(
    State(state): State<AppState>,
    token: AccessToken,
    Json(item): Json<NewSavedItem>,
) -> (StatusCode, Json<MutationResponse>) {
    let list = state.sessions.list_for(token.as_deref()).await;
    let key = item.key();

    let mutation = list.add(item).await;
    respond(mutation, list.is_member(key.content_id, key.kind))
}

pub async fn remove(
    State(state): State<AppState>,
    token: AccessToken,
    Path((kind, id)): Path<(ContentKind, u64)>,
) -> AppResult<(StatusCode, Json<MutationResponse>)> {
    let list = state.sessions.list_for(token.as_deref()).await;

    let mutation = list
        .remove(id, kind)
        .await
        .ok_or_else(|| AppError::Unauthorized("Sign in to manage your list".to_string()))?;

    Ok(respond(mutation, list.is_member(id, kind)))
}

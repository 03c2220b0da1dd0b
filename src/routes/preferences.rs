use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{error::AppResult, services::EmbedProvider};

use super::{extract::DeviceId, AppState};

#[derive(Debug, Deserialize)]
pub struct EmbedPreferenceRequest {
    pub provider: EmbedProvider,
}

#[derive(Debug, Serialize)]
pub struct EmbedPreferenceResponse {
    pub provider: EmbedProvider,
    pub label: &'static str,
    pub available: [EmbedProvider; 3],
}

impl From<EmbedProvider> for EmbedPreferenceResponse {
    fn from(provider: EmbedProvider) -> Self {
        Self {
            provider,
            label: provider.label(),
            available: EmbedProvider::ALL,
        }
    }
}

pub async fn get_embed_provider(
    State(state): State<AppState>,
    DeviceId(device): DeviceId,
) -> Json<EmbedPreferenceResponse> {
    Json(state.preferences.load(&device).await.into())
}

pub async fn set_embed_provider(
    State(state): State<AppState>,
    DeviceId(device): DeviceId,
    Json(request): Json<EmbedPreferenceRequest>,
) -> AppResult<Json<EmbedPreferenceResponse>> {
    state.preferences.save(&device, request.provider).await?;
    Ok(Json(request.provider.into()))
}

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    services::discovery::{self, PersonPage},
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct CreditsQuery {
    #[serde(default)]
    offset: usize,
}

/// Person profile and one chunk of their credits, starting at `offset`
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(params): Query<CreditsQuery>,
) -> AppResult<Json<PersonPage>> {
    let page = discovery::person(state.metadata.as_ref(), id, params.offset).await?;
    Ok(Json(page))
}

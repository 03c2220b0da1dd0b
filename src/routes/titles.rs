use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppResult,
    models::{ContentKey, ContentKind, MediaSummary, Page},
    services::discovery::{self, DetailsPage, DiscoverFilter, KindFilter, Trailer},
};

use super::{extract::AccessToken, AppState};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    query: String,
    page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    page: Option<u32>,
}

/// Discover query string. Kept flat because nested serde types don't
/// survive urlencoded number parsing.
#[derive(Debug, Deserialize)]
pub struct DiscoverQuery {
    #[serde(rename = "type")]
    kind: Option<KindFilter>,
    genre: Option<u32>,
    year: Option<u16>,
    rating: Option<f32>,
    sort_by: Option<String>,
    page: Option<u32>,
}

impl DiscoverQuery {
    fn filter(&self) -> DiscoverFilter {
        let mut filter = DiscoverFilter {
            kind: self.kind.unwrap_or_default(),
            genre: self.genre,
            year: self.year,
            rating: self.rating,
            ..Default::default()
        };
        if let Some(sort_by) = self.sort_by.as_ref().filter(|s| !s.is_empty()) {
            filter.sort_by = sort_by.clone();
        }
        filter
    }
}

/// A listing page plus the page links to render under it
#[derive(Debug, Serialize)]
pub struct ListingResponse {
    #[serde(flatten)]
    pub listing: Page<MediaSummary>,
    pub page_window: Vec<u32>,
}

impl From<Page<MediaSummary>> for ListingResponse {
    fn from(listing: Page<MediaSummary>) -> Self {
        Self {
            page_window: discovery::page_window(listing.page, listing.total_pages),
            listing,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DetailsResponse {
    #[serde(flatten)]
    pub page: DetailsPage,
    pub in_list: bool,
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Json<ListingResponse> {
    let page = params.page.unwrap_or(1);
    let results = discovery::search(state.metadata.as_ref(), &params.query, page).await;
    Json(results.into())
}

pub async fn discover(
    State(state): State<AppState>,
    Query(params): Query<DiscoverQuery>,
) -> Json<ListingResponse> {
    let filter = params.filter();
    let results =
        discovery::discover(state.metadata.as_ref(), &filter, params.page.unwrap_or(1)).await;
    Json(results.into())
}

pub async fn movies(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> Json<ListingResponse> {
    let results = discovery::movies(state.metadata.as_ref(), params.page.unwrap_or(1)).await;
    Json(results.into())
}

pub async fn trending(
    State(state): State<AppState>,
    Path(kind): Path<ContentKind>,
) -> Json<Vec<MediaSummary>> {
    Json(discovery::trending(state.metadata.as_ref(), kind).await)
}

/// Details, top cast, and whether the caller has the title saved
pub async fn details(
    State(state): State<AppState>,
    token: AccessToken,
    Path((kind, id)): Path<(ContentKind, u64)>,
) -> AppResult<Json<DetailsResponse>> {
    let page = discovery::details(state.metadata.as_ref(), ContentKey::new(id, kind)).await?;
    let in_list = state
        .sessions
        .list_for(token.as_deref())
        .await
        .is_member(id, kind);

    Ok(Json(DetailsResponse { page, in_list }))
}

pub async fn trailers(
    State(state): State<AppState>,
    Path((kind, id)): Path<(ContentKind, u64)>,
) -> Json<Vec<Trailer>> {
    Json(discovery::trailers(state.metadata.as_ref(), ContentKey::new(id, kind)).await)
}

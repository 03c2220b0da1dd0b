use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    models::Season,
    services::{EmbedProvider, EpisodeCursor},
};

use super::{extract::DeviceId, AppState};

#[derive(Debug, Deserialize)]
pub struct EpisodeQuery {
    season: Option<u32>,
    episode: Option<u32>,
}

/// One player option
#[derive(Debug, Serialize)]
pub struct EmbedSource {
    pub provider: EmbedProvider,
    pub label: &'static str,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct MovieWatchResponse {
    pub id: u64,
    pub title: Option<String>,
    pub preferred: EmbedProvider,
    pub sources: Vec<EmbedSource>,
}

#[derive(Debug, Serialize)]
pub struct SeriesWatchResponse {
    pub id: u64,
    pub title: Option<String>,
    pub preferred: EmbedProvider,
    pub cursor: EpisodeCursor,
    pub previous: Option<EpisodeCursor>,
    pub next: Option<EpisodeCursor>,
    pub seasons: Vec<Season>,
    pub sources: Vec<EmbedSource>,
}

fn sources(preferred: EmbedProvider, url: impl Fn(EmbedProvider) -> String) -> Vec<EmbedSource> {
    EmbedProvider::ordered(preferred)
        .into_iter()
        .map(|provider| EmbedSource {
            provider,
            label: provider.label(),
            url: url(provider),
        })
        .collect()
}

/// The neighbouring episode, if the cursor can move that way
fn step(cursor: EpisodeCursor, advance: fn(&mut EpisodeCursor) -> bool) -> Option<EpisodeCursor> {
    let mut moved = cursor;
    advance(&mut moved).then_some(moved)
}

pub async fn movie(
    State(state): State<AppState>,
    DeviceId(device): DeviceId,
    Path(id): Path<u64>,
) -> Json<MovieWatchResponse> {
    let (details, preferred) = tokio::join!(
        state.metadata.movie_details(id),
        state.preferences.load(&device),
    );

    let title = match details {
        Ok(details) => Some(details.title),
        Err(e) => {
            tracing::warn!(error = %e, movie_id = id, "Playing movie without details");
            None
        }
    };

    Json(MovieWatchResponse {
        id,
        title,
        preferred,
        sources: sources(preferred, |p| p.movie_url(id)),
    })
}

/// Player for one episode. Without series details every season is assumed
/// to have the default episode count.
pub async fn series(
    State(state): State<AppState>,
    DeviceId(device): DeviceId,
    Path(id): Path<u64>,
    Query(params): Query<EpisodeQuery>,
) -> Json<SeriesWatchResponse> {
    let (details, preferred) = tokio::join!(
        state.metadata.series_details(id),
        state.preferences.load(&device),
    );

    let details = details
        .map_err(|e| tracing::warn!(error = %e, series_id = id, "Playing series without details"))
        .ok();

    let cursor = EpisodeCursor::new(
        details.as_ref(),
        params.season.unwrap_or(1),
        params.episode.unwrap_or(1),
    );

    let (title, seasons) = match details {
        Some(details) => (
            Some(details.name),
            details
                .seasons
                .into_iter()
                .filter(|s| s.season_number > 0)
                .collect(),
        ),
        None => (None, Vec::new()),
    };

    Json(SeriesWatchResponse {
        id,
        title,
        preferred,
        previous: step(cursor, EpisodeCursor::previous),
        next: step(cursor, EpisodeCursor::next),
        sources: sources(preferred, |p| {
            p.episode_url(id, cursor.season, cursor.episode)
        }),
        cursor,
        seasons,
    })
}

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::{
    error::{AppError, AppResult},
    models::SeriesDetails,
};

/// Episodes assumed for a season TMDB doesn't describe
pub const DEFAULT_EPISODE_COUNT: u32 = 10;
/// Device id used when a request doesn't name one
pub const DEFAULT_DEVICE: &str = "default";

const PREFERENCES_FILE: &str = "embed_provider.json";

/// Third-party players that can embed a title by its TMDB id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmbedProvider {
    #[default]
    AutoEmbed,
    VidSrc,
    MultiEmbed,
}

impl EmbedProvider {
    pub const ALL: [EmbedProvider; 3] = [
        EmbedProvider::AutoEmbed,
        EmbedProvider::VidSrc,
        EmbedProvider::MultiEmbed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EmbedProvider::AutoEmbed => "AutoEmbed",
            EmbedProvider::VidSrc => "VidSrc",
            EmbedProvider::MultiEmbed => "MultiEmbed",
        }
    }

    pub fn movie_url(&self, id: u64) -> String {
        match self {
            EmbedProvider::AutoEmbed => format!("https://autoembed.pro/movie/{}", id),
            EmbedProvider::VidSrc => format!("https://vidsrc.to/embed/movie/{}", id),
            EmbedProvider::MultiEmbed => {
                format!("https://multiembed.mov/?video_id={}&tmdb=1", id)
            }
        }
    }

    pub fn episode_url(&self, id: u64, season: u32, episode: u32) -> String {
        match self {
            EmbedProvider::AutoEmbed => {
                format!("https://autoembed.pro/tv/{}/{}/{}", id, season, episode)
            }
            EmbedProvider::VidSrc => {
                format!("https://vidsrc.to/embed/tv/{}/{}/{}", id, season, episode)
            }
            EmbedProvider::MultiEmbed => format!(
                "https://multiembed.mov/?video_id={}&tmdb=1&s={}&e={}",
                id, season, episode
            ),
        }
    }

    /// All providers, `preferred` first
    pub fn ordered(preferred: EmbedProvider) -> Vec<EmbedProvider> {
        std::iter::once(preferred)
            .chain(Self::ALL.into_iter().filter(|p| *p != preferred))
            .collect()
    }
}

/// Season/episode selection for a series player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EpisodeCursor {
    pub season: u32,
    pub episode: u32,
    pub episode_count: u32,
}

impl EpisodeCursor {
    /// Starts at `season`/`episode`, clamping the episode into the season
    pub fn new(details: Option<&SeriesDetails>, season: u32, episode: u32) -> Self {
        let mut cursor = Self {
            season: 1,
            episode: 1,
            episode_count: DEFAULT_EPISODE_COUNT,
        };
        cursor.select_season(details, season);
        cursor.select_episode(episode);
        cursor
    }

    /// Switches season and goes back to its first episode
    pub fn select_season(&mut self, details: Option<&SeriesDetails>, season: u32) {
        self.season = season.max(1);
        self.episode_count = episode_count(details, self.season);
        self.episode = 1;
    }

    /// Jumps to an episode of the current season, clamped into range
    pub fn select_episode(&mut self, episode: u32) {
        self.episode = episode.clamp(1, self.episode_count);
    }

    pub fn next(&mut self) -> bool {
        if self.has_next() {
            self.episode += 1;
            true
        } else {
            false
        }
    }

    pub fn previous(&mut self) -> bool {
        if self.has_previous() {
            self.episode -= 1;
            true
        } else {
            false
        }
    }

    pub fn has_next(&self) -> bool {
        self.episode < self.episode_count
    }

    pub fn has_previous(&self) -> bool {
        self.episode > 1
    }
}

fn episode_count(details: Option<&SeriesDetails>, season: u32) -> u32 {
    details
        .and_then(|d| d.episode_count(season))
        .unwrap_or(DEFAULT_EPISODE_COUNT)
}

/// Embed provider choice per device, persisted as JSON on disk.
///
/// The whole map is rewritten on every save; a missing or unreadable file
/// reads as "nothing chosen yet".
pub struct PreferenceStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl PreferenceStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(PREFERENCES_FILE),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self, device: &str) -> EmbedProvider {
        self.read_all()
            .await
            .get(device)
            .copied()
            .unwrap_or_default()
    }

    pub async fn save(&self, device: &str, provider: EmbedProvider) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut preferences = self.read_all().await;
        preferences.insert(device.to_string(), provider);

        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir).await.map_err(|e| {
                AppError::Internal(format!("Failed to create preferences directory: {}", e))
            })?;
        }

        let body = serde_json::to_vec_pretty(&preferences)
            .map_err(|e| AppError::Internal(format!("Failed to encode preferences: {}", e)))?;
        tokio::fs::write(&self.path, body)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to write preferences: {}", e)))?;

        tracing::info!(device = %device, provider = provider.label(), "Embed provider saved");
        Ok(())
    }

    async fn read_all(&self) -> HashMap<String, EmbedProvider> {
        let body = match tokio::fs::read(&self.path).await {
            Ok(body) => body,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return HashMap::new(),
            Err(e) => {
                tracing::warn!(error = %e, path = %self.path.display(), "Failed to read preferences");
                return HashMap::new();
            }
        };

        serde_json::from_slice(&body).unwrap_or_else(|e| {
            tracing::warn!(error = %e, path = %self.path.display(), "Ignoring corrupt preferences");
            HashMap::new()
        })
    }
}

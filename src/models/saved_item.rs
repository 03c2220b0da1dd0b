use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ContentKey, ContentKind};

/// A user's saved reference to a piece of content.
///
/// Display metadata is copied at save time and never refreshed from upstream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedItem {
    pub user_id: Uuid,
    pub content_id: u64,
    pub kind: ContentKind,
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub rating: Option<f64>,
    pub release_year: Option<i32>,
    pub genre_ids: Vec<u32>,
    /// Set by the store at insertion
    pub added_at: DateTime<Utc>,
}

impl SavedItem {
    pub fn key(&self) -> ContentKey {
        ContentKey::new(self.content_id, self.kind)
    }
}

/// What a caller supplies when saving; owner and timestamp come from elsewhere
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewSavedItem {
    pub content_id: u64,
    pub kind: ContentKind,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub release_year: Option<i32>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

impl NewSavedItem {
    pub fn key(&self) -> ContentKey {
        ContentKey::new(self.content_id, self.kind)
    }

    pub fn into_saved(self, user_id: Uuid, added_at: DateTime<Utc>) -> SavedItem {
        SavedItem {
            user_id,
            content_id: self.content_id,
            kind: self.kind,
            title: self.title,
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            rating: self.rating,
            release_year: self.release_year,
            genre_ids: self.genre_ids,
            added_at,
        }
    }
}

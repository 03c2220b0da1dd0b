use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

pub mod media;
pub mod notification;
pub mod saved_item;

pub use media::{
    CastMember, Credits, Genre, MediaSummary, MovieDetails, Page, Person, PersonCredits,
    Season, SeriesDetails, Video, VideoList,
};
pub use notification::{Notification, NotificationVariant};
pub use saved_item::{NewSavedItem, SavedItem};

/// Discriminates movies from series, since their ids overlap upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentKind {
    #[serde(rename = "movie")]
    Movie,
    #[serde(rename = "tv")]
    Series,
}

impl ContentKind {
    /// Media type string used by TMDB and by the `my_list` table
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Movie => "movie",
            ContentKind::Series => "tv",
        }
    }
}

impl Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(ContentKind::Movie),
            "tv" => Ok(ContentKind::Series),
            other => Err(format!("unknown content kind: {}", other)),
        }
    }
}

/// Composite key addressing a piece of content: ids are only unique per kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentKey {
    pub content_id: u64,
    pub kind: ContentKind,
}

impl ContentKey {
    pub fn new(content_id: u64, kind: ContentKind) -> Self {
        Self { content_id, kind }
    }
}

impl Display for ContentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.content_id, self.kind)
    }
}

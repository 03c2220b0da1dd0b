use serde::{Deserialize, Serialize};

use super::{ContentKey, ContentKind};

// ============================================================================
// TMDB API Types
// ============================================================================

/// One page of a TMDB listing (search, discover, trending, popular)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u64,
}

fn first_page() -> u32 {
    1
}

impl<T> Page<T> {
    /// An empty page, rendered as an empty grid
    pub fn empty(page: u32) -> Self {
        Self {
            page,
            results: Vec::new(),
            total_pages: 0,
            total_results: 0,
        }
    }
}

/// A movie or series as it appears in listings.
///
/// Movies carry `title`/`release_date`, series carry `name`/`first_air_date`;
/// multi-search and combined credits also carry `media_type`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MediaSummary {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u64>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub media_type: Option<String>,
    /// Role played, present on person credits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<String>,
}

impl MediaSummary {
    /// Title for display, whichever of `title`/`name` the kind provides
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or_default()
    }

    /// Kind derived from `media_type`; `None` for people and untagged results
    pub fn kind(&self) -> Option<ContentKind> {
        self.media_type.as_deref().and_then(|t| t.parse().ok())
    }

    pub fn key(&self) -> Option<ContentKey> {
        self.kind().map(|kind| ContentKey::new(self.id, kind))
    }

    /// Tags the item with a kind, as done for single-kind listings
    pub fn tagged(mut self, kind: ContentKind) -> Self {
        self.media_type = Some(kind.as_str().to_string());
        self
    }

    /// Year parsed from whichever release date the item carries
    pub fn release_year(&self) -> Option<i32> {
        self.release_date
            .as_deref()
            .or(self.first_air_date.as_deref())
            .and_then(parse_year)
    }
}

/// Leading `YYYY` of a TMDB date string
pub fn parse_year(date: &str) -> Option<i32> {
    date.get(..4).and_then(|y| y.parse().ok())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub imdb_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Season {
    pub season_number: u32,
    #[serde(default)]
    pub episode_count: u32,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesDetails {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub number_of_seasons: Option<u32>,
    #[serde(default)]
    pub seasons: Vec<Season>,
}

impl SeriesDetails {
    /// Episode count of a season, if TMDB lists it
    pub fn episode_count(&self, season_number: u32) -> Option<u32> {
        self.seasons
            .iter()
            .find(|s| s.season_number == season_number)
            .map(|s| s.episode_count)
            .filter(|count| *count > 0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub order: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Person {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub place_of_birth: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub known_for_department: Option<String>,
}

/// Response of `/person/{id}/combined_credits`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PersonCredits {
    #[serde(default)]
    pub cast: Vec<MediaSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Video {
    pub id: String,
    pub key: String,
    pub name: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct VideoList {
    #[serde(default)]
    pub results: Vec<Video>,
}

/// Media metadata provider abstraction
///
/// Read-only access to listings, details, credits and videos. TMDB is the only
/// implementation; handlers and the discovery service only see this trait.
use crate::{
    error::AppResult,
    models::{
        ContentKey, ContentKind, Credits, MediaSummary, MovieDetails, Page, Person,
        PersonCredits, SeriesDetails, VideoList,
    },
    services::discovery::DiscoverFilter,
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Multi search across movies, series and people
    async fn search(&self, query: &str, page: u32) -> AppResult<Page<MediaSummary>>;

    /// Filtered listing of a single kind
    async fn discover(
        &self,
        kind: ContentKind,
        filter: &DiscoverFilter,
        page: u32,
    ) -> AppResult<Page<MediaSummary>>;

    /// Movie listing restricted to titles with enough votes
    async fn popular_movies(&self, page: u32) -> AppResult<Page<MediaSummary>>;

    async fn trending(&self, kind: ContentKind) -> AppResult<Page<MediaSummary>>;

    async fn movie_details(&self, id: u64) -> AppResult<MovieDetails>;

    async fn series_details(&self, id: u64) -> AppResult<SeriesDetails>;

    async fn credits(&self, key: ContentKey) -> AppResult<Credits>;

    async fn videos(&self, key: ContentKey) -> AppResult<VideoList>;

    async fn person(&self, id: u64) -> AppResult<Person>;

    async fn person_credits(&self, id: u64) -> AppResult<PersonCredits>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Discovery listings: filter combination and pagination
///
/// Everything here is arithmetic over provider pages. Read-only failures are
/// logged and rendered as empty results, never surfaced as errors.
use serde::{Deserialize, Serialize};

use crate::{
    error::AppResult,
    models::{
        CastMember, ContentKey, ContentKind, MediaSummary, MovieDetails, Page, Person,
        SeriesDetails, Video,
    },
    services::providers::MetadataProvider,
};

/// TMDB refuses to serve pages past this one
pub const MAX_PAGES: u32 = 500;
/// Items shown when movies and series are combined on one page
pub const COMBINED_PAGE_SIZE: usize = 20;
/// Items shown on the movie listing page
pub const MOVIE_LISTING_SIZE: usize = 24;
/// Person credits revealed per "load more"
pub const CREDITS_PER_LOAD: usize = 24;
/// Cast members shown on a details page
pub const TOP_CAST: usize = 10;
/// Page links shown around the current page
pub const PAGE_WINDOW: u32 = 5;

pub const DEFAULT_SORT: &str = "popularity.desc";

/// Which kinds a discover query spans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum KindFilter {
    #[default]
    All,
    Movie,
    Tv,
}

/// User-selected discover filters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoverFilter {
    #[serde(default, rename = "type")]
    pub kind: KindFilter,
    #[serde(default)]
    pub genre: Option<u32>,
    #[serde(default)]
    pub year: Option<u16>,
    /// Minimum vote average
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default = "default_sort")]
    pub sort_by: String,
}

fn default_sort() -> String {
    DEFAULT_SORT.to_string()
}

impl Default for DiscoverFilter {
    fn default() -> Self {
        Self {
            kind: KindFilter::All,
            genre: None,
            year: None,
            rating: None,
            sort_by: default_sort(),
        }
    }
}

impl DiscoverFilter {
    /// TMDB discover parameters for one kind.
    ///
    /// Series have no `year`; the same filter maps to `first_air_date_year`.
    pub fn query_params(&self, kind: ContentKind, page: u32) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", page.to_string()), ("sort_by", self.sort_by.clone())];

        if let Some(genre) = self.genre {
            params.push(("with_genres", genre.to_string()));
        }
        if let Some(year) = self.year {
            let name = match kind {
                ContentKind::Movie => "year",
                ContentKind::Series => "first_air_date_year",
            };
            params.push((name, year.to_string()));
        }
        if let Some(rating) = self.rating {
            params.push(("vote_average.gte", rating.to_string()));
        }

        params
    }
}

/// Tags every result with `kind` and clamps the page count
pub fn single_kind_page(page: Page<MediaSummary>, kind: ContentKind) -> Page<MediaSummary> {
    Page {
        page: page.page,
        results: page.results.into_iter().map(|r| r.tagged(kind)).collect(),
        total_pages: page.total_pages.min(MAX_PAGES),
        total_results: page.total_results,
    }
}

/// Combines a movie page and a series page into one.
///
/// Movies come first, then series, cut to `COMBINED_PAGE_SIZE`. The page count
/// is the larger of the two so either kind can still be paged through.
pub fn merge_pages(
    page: u32,
    movies: Page<MediaSummary>,
    series: Page<MediaSummary>,
) -> Page<MediaSummary> {
    let results: Vec<MediaSummary> = movies
        .results
        .into_iter()
        .map(|r| r.tagged(ContentKind::Movie))
        .chain(series.results.into_iter().map(|r| r.tagged(ContentKind::Series)))
        .take(COMBINED_PAGE_SIZE)
        .collect();

    Page {
        page,
        results,
        total_pages: movies.total_pages.max(series.total_pages),
        total_results: movies.total_results + series.total_results,
    }
}

/// A requested page number, kept within what TMDB will serve
pub fn clamp_page(page: u32) -> u32 {
    page.clamp(1, MAX_PAGES)
}

/// Page numbers to render as links: up to five, centred on `current` when possible
pub fn page_window(current: u32, total_pages: u32) -> Vec<u32> {
    let start = current.saturating_sub(PAGE_WINDOW / 2).max(1);
    let end = total_pages.min(start.saturating_add(PAGE_WINDOW - 1));
    (start..=end).collect()
}

/// Drops people and poster-less items from a multi search page
pub fn filter_search_results(page: Page<MediaSummary>) -> Page<MediaSummary> {
    Page {
        page: page.page,
        results: page
            .results
            .into_iter()
            .filter(|r| r.media_type.as_deref() != Some("person") && r.poster_path.is_some())
            .collect(),
        total_pages: page.total_pages.min(MAX_PAGES),
        total_results: page.total_results,
    }
}

/// Removes repeated `(id, media_type)` credits, keeping the first, then
/// orders by popularity, most popular first
pub fn dedupe_credits(credits: Vec<MediaSummary>) -> Vec<MediaSummary> {
    let mut seen = std::collections::HashSet::new();
    let mut unique: Vec<MediaSummary> = credits
        .into_iter()
        .filter(|c| seen.insert((c.id, c.media_type.clone())))
        .collect();

    unique.sort_by(|a, b| {
        b.popularity
            .unwrap_or(0.0)
            .total_cmp(&a.popularity.unwrap_or(0.0))
    });
    unique
}

/// A slice of a person's credits for incremental loading
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreditChunk {
    pub items: Vec<MediaSummary>,
    pub offset: usize,
    pub total: usize,
    pub has_more: bool,
}

pub fn credit_chunk(credits: &[MediaSummary], offset: usize) -> CreditChunk {
    let start = offset.min(credits.len());
    let end = (start + CREDITS_PER_LOAD).min(credits.len());

    CreditChunk {
        items: credits[start..end].to_vec(),
        offset: start,
        total: credits.len(),
        has_more: end < credits.len(),
    }
}

/// A playable trailer
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Trailer {
    pub name: String,
    pub key: String,
    pub kind: String,
    pub embed_url: String,
}

/// Keeps YouTube trailers and teasers
pub fn filter_trailers(videos: Vec<Video>) -> Vec<Trailer> {
    videos
        .into_iter()
        .filter(|v| v.site == "YouTube" && (v.video_type == "Trailer" || v.video_type == "Teaser"))
        .map(|v| Trailer {
            embed_url: format!("https://www.youtube.com/embed/{}?autoplay=1", v.key),
            name: v.name,
            key: v.key,
            kind: v.video_type,
        })
        .collect()
}

/// Details of either kind, as shown on a details page
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "media_type", rename_all = "lowercase")]
pub enum TitleDetails {
    Movie(MovieDetails),
    Tv(SeriesDetails),
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DetailsPage {
    pub details: TitleDetails,
    pub cast: Vec<CastMember>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PersonPage {
    pub person: Person,
    pub credits: CreditChunk,
}

/// Service functions combining provider calls with the rules above.
///
/// The provider is passed in so handlers decide which one is configured.
pub async fn search(
    provider: &dyn MetadataProvider,
    query: &str,
    page: u32,
) -> Page<MediaSummary> {
    let page = clamp_page(page);
    if query.trim().is_empty() {
        return Page::empty(page);
    }

    match provider.search(query, page).await {
        Ok(results) => filter_search_results(results),
        Err(e) => {
            tracing::error!(error = %e, query = %query, "Error searching");
            Page::empty(page)
        }
    }
}

pub async fn discover(
    provider: &dyn MetadataProvider,
    filter: &DiscoverFilter,
    page: u32,
) -> Page<MediaSummary> {
    let page = clamp_page(page);

    let result = match filter.kind {
        KindFilter::Movie => provider
            .discover(ContentKind::Movie, filter, page)
            .await
            .map(|p| single_kind_page(p, ContentKind::Movie)),
        KindFilter::Tv => provider
            .discover(ContentKind::Series, filter, page)
            .await
            .map(|p| single_kind_page(p, ContentKind::Series)),
        KindFilter::All => {
            let (movies, series) = tokio::join!(
                provider.discover(ContentKind::Movie, filter, page),
                provider.discover(ContentKind::Series, filter, page),
            );
            movies.and_then(|m| series.map(|s| merge_pages(page, m, s)))
        }
    };

    result.unwrap_or_else(|e| {
        tracing::error!(error = %e, filter = ?filter, page, "Error applying filters");
        Page::empty(page)
    })
}

pub async fn movies(provider: &dyn MetadataProvider, page: u32) -> Page<MediaSummary> {
    let page = clamp_page(page);

    match provider.popular_movies(page).await {
        Ok(mut listing) => {
            listing.results.truncate(MOVIE_LISTING_SIZE);
            single_kind_page(listing, ContentKind::Movie)
        }
        Err(e) => {
            tracing::error!(error = %e, page, "Error fetching movies");
            Page::empty(page)
        }
    }
}

pub async fn trending(provider: &dyn MetadataProvider, kind: ContentKind) -> Vec<MediaSummary> {
    match provider.trending(kind).await {
        Ok(page) => single_kind_page(page, kind).results,
        Err(e) => {
            tracing::error!(error = %e, kind = %kind, "Error fetching trending");
            Vec::new()
        }
    }
}

/// Details plus top-billed cast. Missing details are an error; missing
/// credits only leave the cast empty.
pub async fn details(provider: &dyn MetadataProvider, key: ContentKey) -> AppResult<DetailsPage> {
    let (details, credits) = tokio::join!(
        async {
            match key.kind {
                ContentKind::Movie => provider
                    .movie_details(key.content_id)
                    .await
                    .map(TitleDetails::Movie),
                ContentKind::Series => provider
                    .series_details(key.content_id)
                    .await
                    .map(TitleDetails::Tv),
            }
        },
        provider.credits(key),
    );

    let cast = match credits {
        Ok(credits) => credits.cast.into_iter().take(TOP_CAST).collect(),
        Err(e) => {
            tracing::warn!(error = %e, key = %key, "Error fetching credits");
            Vec::new()
        }
    };

    Ok(DetailsPage {
        details: details?,
        cast,
    })
}

pub async fn trailers(provider: &dyn MetadataProvider, key: ContentKey) -> Vec<Trailer> {
    match provider.videos(key).await {
        Ok(videos) => filter_trailers(videos.results),
        Err(e) => {
            tracing::error!(error = %e, key = %key, "Error fetching videos");
            Vec::new()
        }
    }
}

pub async fn person(
    provider: &dyn MetadataProvider,
    id: u64,
    offset: usize,
) -> AppResult<PersonPage> {
    let (person, credits) = tokio::join!(provider.person(id), provider.person_credits(id));

    let credits = match credits {
        Ok(credits) => dedupe_credits(credits.cast),
        Err(e) => {
            tracing::warn!(error = %e, person_id = id, "Error fetching person credits");
            Vec::new()
        }
    };

    Ok(PersonPage {
        person: person?,
        credits: credit_chunk(&credits, offset),
    })
}

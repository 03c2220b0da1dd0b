/// TMDB API provider
///
/// Every request carries `api_key` and `language=en-US`. Responses are cached
/// in Redis when a cache is configured.
///
/// API Flow:
/// 1. Listings: /search/multi, /discover/{movie|tv}, /trending/{movie|tv}/week
/// 2. Details: /movie/{id}, /tv/{id}, /{kind}/{id}/credits, /{kind}/{id}/videos
/// 3. People: /person/{id}, /person/{id}/combined_credits
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{
        ContentKey, ContentKind, Credits, MediaSummary, MovieDetails, Page, Person,
        PersonCredits, SeriesDetails, VideoList,
    },
    services::{discovery::DiscoverFilter, providers::MetadataProvider},
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

const LISTING_CACHE_TTL: u64 = 600; // 10 minutes
const TRENDING_CACHE_TTL: u64 = 3600; // 1 hour
const DETAILS_CACHE_TTL: u64 = 86400; // 1 day
const LANGUAGE: &str = "en-US";
const MIN_VOTE_COUNT: &str = "100";

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Option<Cache>,
}

impl TmdbProvider {
    pub fn new(cache: Option<Cache>, api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            cache,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    /// GETs a TMDB path and decodes the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let response = self
            .http_client
            .get(self.endpoint(path))
            .query(&[("api_key", self.api_key.as_str()), ("language", LANGUAGE)])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("TMDB resource {}", path)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(path = %path, status = %status, body = %body, "TMDB request failed");
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, path = %path, "Failed to deserialize TMDB response");
            AppError::ExternalApi(format!("Failed to parse TMDB response: {}", e))
        })
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn search(&self, query: &str, page: u32) -> AppResult<Page<MediaSummary>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        cached!(
            self.cache.as_ref(),
            CacheKey::Search {
                query: query.to_string(),
                page,
            },
            LISTING_CACHE_TTL,
            async move {
                let results: Page<MediaSummary> = self
                    .get_json(
                        "search/multi",
                        &[("query", query.to_string()), ("page", page.to_string())],
                    )
                    .await?;

                tracing::info!(
                    query = %query,
                    page,
                    results = results.results.len(),
                    provider = "tmdb",
                    "Search completed"
                );

                Ok::<_, AppError>(results)
            }
        )
    }

    async fn discover(
        &self,
        kind: ContentKind,
        filter: &DiscoverFilter,
        page: u32,
    ) -> AppResult<Page<MediaSummary>> {
        let params = filter.query_params(kind, page);
        let encoded = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        cached!(
            self.cache.as_ref(),
            CacheKey::Discover {
                kind,
                params: encoded,
            },
            LISTING_CACHE_TTL,
            async move {
                let path = format!("discover/{}", kind);
                self.get_json::<Page<MediaSummary>>(&path, &params).await
            }
        )
    }

    async fn popular_movies(&self, page: u32) -> AppResult<Page<MediaSummary>> {
        cached!(
            self.cache.as_ref(),
            CacheKey::PopularMovies(page),
            LISTING_CACHE_TTL,
            async move {
                self.get_json::<Page<MediaSummary>>(
                    "discover/movie",
                    &[
                        ("page", page.to_string()),
                        ("vote_count.gte", MIN_VOTE_COUNT.to_string()),
                    ],
                )
                .await
            }
        )
    }

    async fn trending(&self, kind: ContentKind) -> AppResult<Page<MediaSummary>> {
        cached!(
            self.cache.as_ref(),
            CacheKey::Trending(kind),
            TRENDING_CACHE_TTL,
            async move {
                let path = format!("trending/{}/week", kind);
                self.get_json::<Page<MediaSummary>>(&path, &[]).await
            }
        )
    }

    async fn movie_details(&self, id: u64) -> AppResult<MovieDetails> {
        cached!(
            self.cache.as_ref(),
            CacheKey::Details(ContentKey::new(id, ContentKind::Movie)),
            DETAILS_CACHE_TTL,
            async move {
                self.get_json::<MovieDetails>(&format!("movie/{}", id), &[])
                    .await
            }
        )
    }

    async fn series_details(&self, id: u64) -> AppResult<SeriesDetails> {
        cached!(
            self.cache.as_ref(),
            CacheKey::Details(ContentKey::new(id, ContentKind::Series)),
            DETAILS_CACHE_TTL,
            async move {
                self.get_json::<SeriesDetails>(&format!("tv/{}", id), &[])
                    .await
            }
        )
    }

    async fn credits(&self, key: ContentKey) -> AppResult<Credits> {
        cached!(
            self.cache.as_ref(),
            CacheKey::Credits(key),
            DETAILS_CACHE_TTL,
            async move {
                let path = format!("{}/{}/credits", key.kind, key.content_id);
                self.get_json::<Credits>(&path, &[]).await
            }
        )
    }

    async fn videos(&self, key: ContentKey) -> AppResult<VideoList> {
        cached!(
            self.cache.as_ref(),
            CacheKey::Videos(key),
            DETAILS_CACHE_TTL,
            async move {
                let path = format!("{}/{}/videos", key.kind, key.content_id);
                self.get_json::<VideoList>(&path, &[]).await
            }
        )
    }

    async fn person(&self, id: u64) -> AppResult<Person> {
        cached!(
            self.cache.as_ref(),
            CacheKey::Person(id),
            DETAILS_CACHE_TTL,
            async move {
                self.get_json::<Person>(&format!("person/{}", id), &[])
                    .await
            }
        )
    }

    async fn person_credits(&self, id: u64) -> AppResult<PersonCredits> {
        cached!(
            self.cache.as_ref(),
            CacheKey::PersonCredits(id),
            DETAILS_CACHE_TTL,
            async move {
                self.get_json::<PersonCredits>(&format!("person/{}/combined_credits", id), &[])
                    .await
            }
        )
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::http::{header::AUTHORIZATION, HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};
use uuid::Uuid;

use reelshelf::{
    db::{InMemoryListStore, ListStore},
    error::{AppError, AppResult},
    models::{
        ContentKey, ContentKind, Credits, MediaSummary, MovieDetails, NewSavedItem, Page, Person,
        PersonCredits, Season, SavedItem, SeriesDetails, Video, VideoList,
    },
    routes::{create_router, AppState},
    services::{
        auth::{AuthProvider, AuthUser, Session},
        discovery::DiscoverFilter,
        MetadataProvider, PreferenceStore,
    },
};

const ANA_EMAIL: &str = "ana@example.com";
const ANA_TOKEN: &str = "token-ana";
const PASSWORD: &str = "secret";
/// A token the provider issued through an OAuth redirect, never seen by sign-in
const OAUTH_TOKEN: &str = "oauth-issued-token";

fn ana_id() -> Uuid {
    Uuid::from_u128(0x8d0f_d2b3_9ca7_4d9e_a95f_9e13_dded_323e)
}

// ============================================================================
// Fakes
// ============================================================================

fn summary(id: u64, media_type: Option<&str>) -> MediaSummary {
    MediaSummary {
        id,
        title: Some(format!("Title {}", id)),
        poster_path: Some(format!("/{}.jpg", id)),
        media_type: media_type.map(str::to_string),
        ..Default::default()
    }
}

fn listing(ids: std::ops::Range<u64>, total_pages: u32) -> Page<MediaSummary> {
    Page {
        page: 1,
        results: ids.map(|id| summary(id, None)).collect(),
        total_pages,
        total_results: 0,
    }
}

/// Canned TMDB: movie 27205 and series 1396 exist, everything else is 404
struct FakeMetadata;

#[async_trait::async_trait]
impl MetadataProvider for FakeMetadata {
    async fn search(&self, _query: &str, page: u32) -> AppResult<Page<MediaSummary>> {
        let mut no_poster = summary(3, Some("movie"));
        no_poster.poster_path = None;
        Ok(Page {
            page,
            results: vec![
                summary(1, Some("movie")),
                summary(2, Some("person")),
                no_poster,
                summary(4, Some("tv")),
            ],
            total_pages: 1200,
            total_results: 4,
        })
    }

    async fn discover(
        &self,
        kind: ContentKind,
        _filter: &DiscoverFilter,
        _page: u32,
    ) -> AppResult<Page<MediaSummary>> {
        Ok(match kind {
            ContentKind::Movie => listing(0..15, 8),
            ContentKind::Series => listing(100..115, 12),
        })
    }

    async fn popular_movies(&self, _page: u32) -> AppResult<Page<MediaSummary>> {
        Ok(listing(0..20, 3))
    }

    async fn trending(&self, _kind: ContentKind) -> AppResult<Page<MediaSummary>> {
        Err(AppError::ExternalApi("TMDB unavailable".to_string()))
    }

    async fn movie_details(&self, id: u64) -> AppResult<MovieDetails> {
        if id != 27205 {
            return Err(AppError::NotFound(format!("movie {}", id)));
        }
        Ok(MovieDetails {
            id,
            title: "Inception".to_string(),
            overview: None,
            tagline: None,
            poster_path: None,
            backdrop_path: None,
            release_date: Some("2010-07-15".to_string()),
            runtime: Some(148),
            vote_average: Some(8.4),
            genres: Vec::new(),
            imdb_id: None,
        })
    }

    async fn series_details(&self, id: u64) -> AppResult<SeriesDetails> {
        if id != 1396 {
            return Err(AppError::NotFound(format!("series {}", id)));
        }
        Ok(SeriesDetails {
            id,
            name: "Breaking Bad".to_string(),
            overview: None,
            tagline: None,
            poster_path: None,
            backdrop_path: None,
            first_air_date: None,
            vote_average: None,
            genres: Vec::new(),
            number_of_seasons: Some(2),
            seasons: vec![
                Season {
                    season_number: 0,
                    episode_count: 4,
                    name: Some("Specials".to_string()),
                },
                Season {
                    season_number: 1,
                    episode_count: 7,
                    name: None,
                },
                Season {
                    season_number: 2,
                    episode_count: 13,
                    name: None,
                },
            ],
        })
    }

    async fn credits(&self, _key: ContentKey) -> AppResult<Credits> {
        Ok(Credits::default())
    }

    async fn videos(&self, _key: ContentKey) -> AppResult<VideoList> {
        Ok(VideoList {
            results: vec![
                Video {
                    id: "v1".to_string(),
                    key: "YoHD9XEInc0".to_string(),
                    name: "Official Trailer".to_string(),
                    site: "YouTube".to_string(),
                    video_type: "Trailer".to_string(),
                },
                Video {
                    id: "v2".to_string(),
                    key: "bts".to_string(),
                    name: "Behind the Scenes".to_string(),
                    site: "YouTube".to_string(),
                    video_type: "Featurette".to_string(),
                },
            ],
        })
    }

    async fn person(&self, id: u64) -> AppResult<Person> {
        Ok(Person {
            id,
            name: "Bryan Cranston".to_string(),
            biography: None,
            birthday: None,
            place_of_birth: None,
            profile_path: None,
            known_for_department: None,
        })
    }

    async fn person_credits(&self, _id: u64) -> AppResult<PersonCredits> {
        Ok(PersonCredits {
            cast: (0..30).map(|id| summary(id, Some("movie"))).collect(),
        })
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// One account, reachable by email or by the username "ana"
struct FakeAuth {
    signed_out: AtomicBool,
}

fn ana_session() -> Session {
    Session {
        access_token: ANA_TOKEN.to_string(),
        refresh_token: None,
        expires_in: Some(3600),
        user: AuthUser {
            id: ana_id(),
            email: Some(ANA_EMAIL.to_string()),
        },
    }
}

#[async_trait::async_trait]
impl AuthProvider for FakeAuth {
    async fn sign_up(
        &self,
        _email: &str,
        _password: &str,
        _username: Option<String>,
    ) -> AppResult<Option<Session>> {
        Ok(None)
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> AppResult<Session> {
        if email == ANA_EMAIL && password == PASSWORD {
            Ok(ana_session())
        } else {
            Err(AppError::Unauthorized("Invalid login credentials".to_string()))
        }
    }

    async fn email_for_username(&self, username: &str) -> AppResult<Option<String>> {
        Ok((username == "ana").then(|| ANA_EMAIL.to_string()))
    }

    fn oauth_authorize_url(&self, provider: &str) -> AppResult<String> {
        Ok(format!("https://auth.local/authorize?provider={}", provider))
    }

    async fn sign_out(&self, _access_token: &str) -> AppResult<()> {
        self.signed_out.store(true, Ordering::SeqCst);
        Err(AppError::ExternalApi("logout endpoint down".to_string()))
    }

    async fn reset_password(&self, _email: &str) -> AppResult<()> {
        Ok(())
    }

    async fn update_password(&self, _access_token: &str, _new_password: &str) -> AppResult<()> {
        Ok(())
    }

    async fn user(&self, access_token: &str) -> AppResult<AuthUser> {
        match access_token {
            ANA_TOKEN | OAUTH_TOKEN => Ok(ana_session().user),
            _ => Err(AppError::Unauthorized("invalid JWT".to_string())),
        }
    }
}

/// In-memory store whose writes can be switched to fail
#[derive(Default)]
struct FlakyStore {
    inner: InMemoryListStore,
    fail_writes: AtomicBool,
}

impl FlakyStore {
    fn check(&self) -> AppResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(AppError::ExternalApi("store unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait::async_trait]
impl ListStore for FlakyStore {
    async fn fetch_keys(&self, user_id: Uuid) -> AppResult<Vec<ContentKey>> {
        self.inner.fetch_keys(user_id).await
    }

    async fn fetch_items(&self, user_id: Uuid) -> AppResult<Vec<SavedItem>> {
        self.inner.fetch_items(user_id).await
    }

    async fn insert(&self, user_id: Uuid, item: NewSavedItem) -> AppResult<SavedItem> {
        self.check()?;
        self.inner.insert(user_id, item).await
    }

    async fn delete(&self, user_id: Uuid, key: ContentKey) -> AppResult<()> {
        self.check()?;
        self.inner.delete(user_id, key).await
    }
}

// ============================================================================
// Harness
// ============================================================================

struct Harness {
    server: TestServer,
    store: Arc<FlakyStore>,
    _preferences_dir: tempfile::TempDir,
}

fn harness() -> Harness {
    let preferences_dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FlakyStore::default());
    let server = server_with(store.clone(), preferences_dir.path());

    Harness {
        server,
        store,
        _preferences_dir: preferences_dir,
    }
}

fn server_with(store: Arc<FlakyStore>, preferences_dir: &std::path::Path) -> TestServer {
    let state = AppState::new(
        Arc::new(FakeMetadata),
        Arc::new(FakeAuth {
            signed_out: AtomicBool::new(false),
        }),
        store,
        PreferenceStore::new(preferences_dir),
    );
    TestServer::new(create_router(state)).unwrap()
}

fn bearer() -> (HeaderName, HeaderValue) {
    bearer_for(ANA_TOKEN)
}

fn bearer_for(token: &str) -> (HeaderName, HeaderValue) {
    (
        AUTHORIZATION,
        format!("Bearer {}", token).parse::<HeaderValue>().unwrap(),
    )
}

fn new_item(content_id: u64, kind: ContentKind, title: &str) -> NewSavedItem {
    NewSavedItem {
        content_id,
        kind,
        title: title.to_string(),
        poster_path: None,
        backdrop_path: None,
        rating: None,
        release_year: None,
        genre_ids: Vec::new(),
    }
}

async fn sign_in(server: &TestServer) -> Value {
    let response = server
        .post("/api/v1/auth/sign-in")
        .json(&json!({ "email": ANA_EMAIL, "password": PASSWORD }))
        .await;
    response.assert_status_ok();
    response.json()
}

async fn in_list(server: &TestServer, kind: &str, id: u64) -> bool {
    let (name, value) = bearer();
    let response = server
        .get(&format!("/api/v1/my-list/{}/{}", kind, id))
        .add_header(name, value)
        .await;
    response.assert_status_ok();
    response.json::<Value>()["in_list"].as_bool().unwrap()
}

// ============================================================================
// Discovery
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let h = harness();
    let response = h.server.get("/health").await;
    response.assert_status_ok();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_search_drops_people_and_posterless_results() {
    let h = harness();
    let response = h.server.get("/api/v1/search?query=inception&page=1").await;
    response.assert_status_ok();

    let body: Value = response.json();
    let ids: Vec<u64> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 4]);
    assert_eq!(body["total_pages"], 500);
    assert_eq!(body["page_window"], json!([1, 2, 3, 4, 5]));
}

#[tokio::test]
async fn test_huge_page_number_is_clamped() {
    let h = harness();
    let response = h
        .server
        .get("/api/v1/search?query=heat&page=4294967295")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["page"], 500);
    assert_eq!(body["page_window"], json!([498, 499, 500]));

    h.server
        .get("/api/v1/movies?page=4294967295")
        .await
        .assert_status_ok();
    h.server
        .get("/api/v1/discover?page=4294967295")
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_discover_all_combines_kinds() {
    let h = harness();
    let response = h.server.get("/api/v1/discover?genre=18&year=2008").await;
    response.assert_status_ok();

    let body: Value = response.json();
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 20);
    assert_eq!(results[0]["media_type"], "movie");
    assert_eq!(results[15]["media_type"], "tv");
    assert_eq!(body["total_pages"], 12);
}

#[tokio::test]
async fn test_discover_single_kind() {
    let h = harness();
    let response = h.server.get("/api/v1/discover?type=tv&page=2").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["results"].as_array().unwrap().len(), 15);
    assert!(body["results"]
        .as_array()
        .unwrap()
        .iter()
        .all(|r| r["media_type"] == "tv"));
}

#[tokio::test]
async fn test_trending_failure_is_empty_list() {
    let h = harness();
    let response = h.server.get("/api/v1/trending/movie").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!([]));
}

#[tokio::test]
async fn test_details_and_missing_title() {
    let h = harness();

    let response = h.server.get("/api/v1/titles/movie/27205").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["details"]["title"], "Inception");
    assert_eq!(body["details"]["media_type"], "movie");
    assert_eq!(body["in_list"], false);

    let response = h.server.get("/api/v1/titles/movie/1").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_trailers_keep_youtube_trailers() {
    let h = harness();
    let response = h.server.get("/api/v1/titles/tv/1396/trailers").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(
        body[0]["embed_url"],
        "https://www.youtube.com/embed/YoHD9XEInc0?autoplay=1"
    );
}

#[tokio::test]
async fn test_person_credits_load_in_chunks() {
    let h = harness();

    let body: Value = h.server.get("/api/v1/people/17419").await.json();
    assert_eq!(body["credits"]["items"].as_array().unwrap().len(), 24);
    assert_eq!(body["credits"]["has_more"], true);

    let body: Value = h.server.get("/api/v1/people/17419?offset=24").await.json();
    assert_eq!(body["credits"]["items"].as_array().unwrap().len(), 6);
    assert_eq!(body["credits"]["has_more"], false);
}

// ============================================================================
// My list
// ============================================================================

#[tokio::test]
async fn test_add_without_session_is_refused() {
    let h = harness();

    let response = h
        .server
        .post("/api/v1/my-list")
        .json(&new_item(27205, ContentKind::Movie, "Inception"))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["notification"]["title"], "Sign in required");
    assert_eq!(body["in_list"], false);
    assert_eq!(h.store.inner.len_for(ana_id()).await, 0);
}

#[tokio::test]
async fn test_membership_loaded_on_sign_in() {
    let h = harness();
    h.store
        .insert(ana_id(), new_item(1001, ContentKind::Movie, "Heat"))
        .await
        .unwrap();
    h.store
        .insert(ana_id(), new_item(2002, ContentKind::Series, "The Wire"))
        .await
        .unwrap();

    let body = sign_in(&h.server).await;
    assert_eq!(body["saved_items"], 2);

    assert!(in_list(&h.server, "movie", 1001).await);
    assert!(!in_list(&h.server, "tv", 1001).await);
    assert!(in_list(&h.server, "tv", 2002).await);
}

#[tokio::test]
async fn test_sign_in_with_username() {
    let h = harness();
    let response = h
        .server
        .post("/api/v1/auth/sign-in")
        .json(&json!({ "username": "ana", "password": PASSWORD }))
        .await;
    response.assert_status_ok();

    let response = h
        .server
        .post("/api/v1/auth/sign-in")
        .json(&json!({ "username": "bob", "password": PASSWORD }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_add_then_remove_updates_membership() {
    let h = harness();
    sign_in(&h.server).await;
    let (name, value) = bearer();

    let response = h
        .server
        .post("/api/v1/my-list")
        .add_header(name.clone(), value.clone())
        .json(&new_item(1396, ContentKind::Series, "Breaking Bad"))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["in_list"], true);
    assert_eq!(
        body["notification"]["description"],
        "Breaking Bad has been added to your list."
    );
    assert!(in_list(&h.server, "tv", 1396).await);
    assert!(!in_list(&h.server, "movie", 1396).await);

    let items: Value = h
        .server
        .get("/api/v1/my-list")
        .add_header(name.clone(), value.clone())
        .await
        .json();
    assert_eq!(items.as_array().unwrap().len(), 1);

    let response = h
        .server
        .delete("/api/v1/my-list/tv/1396")
        .add_header(name, value)
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>()["notification"]["title"],
        "Removed from My List"
    );
    assert!(!in_list(&h.server, "tv", 1396).await);
}

#[tokio::test]
async fn test_failed_writes_leave_membership_unchanged() {
    let h = harness();
    h.store
        .insert(ana_id(), new_item(1001, ContentKind::Movie, "Heat"))
        .await
        .unwrap();
    sign_in(&h.server).await;
    h.store.fail_writes.store(true, Ordering::SeqCst);
    let (name, value) = bearer();

    let response = h
        .server
        .delete("/api/v1/my-list/movie/1001")
        .add_header(name.clone(), value.clone())
        .await;
    response.assert_status(StatusCode::BAD_GATEWAY);
    assert_eq!(
        response.json::<Value>()["notification"]["variant"],
        "destructive"
    );
    assert!(in_list(&h.server, "movie", 1001).await);

    let response = h
        .server
        .post("/api/v1/my-list")
        .add_header(name, value)
        .json(&new_item(949, ContentKind::Movie, "Heat"))
        .await;
    response.assert_status(StatusCode::BAD_GATEWAY);
    assert!(!in_list(&h.server, "movie", 949).await);
}

#[tokio::test]
async fn test_duplicate_add_over_http_reports_one_failure() {
    let h = harness();
    sign_in(&h.server).await;
    let (name, value) = bearer();

    h.server
        .post("/api/v1/my-list")
        .add_header(name.clone(), value.clone())
        .json(&new_item(1001, ContentKind::Movie, "Heat"))
        .await
        .assert_status_ok();

    let response = h
        .server
        .post("/api/v1/my-list")
        .add_header(name, value)
        .json(&new_item(1001, ContentKind::Movie, "Heat"))
        .await;
    response.assert_status(StatusCode::BAD_GATEWAY);

    let body: Value = response.json();
    assert!(body["notification"].is_object());
    assert_eq!(
        body["notification"]["description"],
        "Failed to add item to your list."
    );
    assert_eq!(body["in_list"], true);
    assert_eq!(h.store.inner.len_for(ana_id()).await, 1);
}

#[tokio::test]
async fn test_remove_and_list_require_session() {
    let h = harness();

    h.server
        .delete("/api/v1/my-list/movie/1001")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    h.server
        .get("/api/v1/my-list")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_sign_out_clears_membership_even_if_provider_fails() {
    let h = harness();
    h.store
        .insert(ana_id(), new_item(1001, ContentKind::Movie, "Heat"))
        .await
        .unwrap();
    sign_in(&h.server).await;
    assert!(in_list(&h.server, "movie", 1001).await);

    let (name, value) = bearer();
    h.server
        .post("/api/v1/auth/sign-out")
        .add_header(name, value)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    assert!(!in_list(&h.server, "movie", 1001).await);
}

#[tokio::test]
async fn test_unconfirmed_sign_up_has_no_session() {
    let h = harness();
    let response = h
        .server
        .post("/api/v1/auth/sign-up")
        .json(&json!({ "email": "new@example.com", "password": PASSWORD, "username": "new" }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["confirmation_required"], true);
    assert!(body["session"].is_null());
}

#[tokio::test]
async fn test_oauth_url() {
    let h = harness();
    let body: Value = h.server.get("/api/v1/auth/oauth/google").await.json();
    assert_eq!(body["url"], "https://auth.local/authorize?provider=google");
}

#[tokio::test]
async fn test_oauth_token_adopted_as_session() {
    let h = harness();
    h.store
        .insert(ana_id(), new_item(1001, ContentKind::Movie, "Heat"))
        .await
        .unwrap();
    let (name, value) = bearer_for(OAUTH_TOKEN);

    h.server
        .post("/api/v1/my-list")
        .add_header(name.clone(), value.clone())
        .json(&new_item(1396, ContentKind::Series, "Breaking Bad"))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let response = h
        .server
        .post("/api/v1/auth/session")
        .add_header(name.clone(), value.clone())
        .json(&json!({ "refresh_token": "refresh", "expires_in": 3600 }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["saved_items"], 1);
    assert_eq!(body["session"]["access_token"], OAUTH_TOKEN);

    let response = h
        .server
        .post("/api/v1/my-list")
        .add_header(name, value)
        .json(&new_item(1396, ContentKind::Series, "Breaking Bad"))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["in_list"], true);
}

#[tokio::test]
async fn test_adopting_invalid_token_is_rejected() {
    let h = harness();
    let (name, value) = bearer_for("forged");

    h.server
        .post("/api/v1/auth/session")
        .add_header(name, value)
        .json(&json!({}))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    h.server
        .post("/api/v1/auth/session")
        .json(&json!({}))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_session_is_anonymous() {
    let h = harness();
    h.store
        .insert(ana_id(), new_item(1001, ContentKind::Movie, "Heat"))
        .await
        .unwrap();
    let (name, value) = bearer_for(OAUTH_TOKEN);

    h.server
        .post("/api/v1/auth/session")
        .add_header(name.clone(), value.clone())
        .json(&json!({ "expires_in": 0 }))
        .await
        .assert_status_ok();

    let response = h
        .server
        .get("/api/v1/my-list/movie/1001")
        .add_header(name.clone(), value.clone())
        .await;
    assert_eq!(response.json::<Value>()["in_list"], false);

    h.server
        .get("/api/v1/my-list")
        .add_header(name, value)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Playback
// ============================================================================

#[tokio::test]
async fn test_embed_provider_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FlakyStore::default());
    let device = HeaderName::from_static("x-device-id");

    let server = server_with(store.clone(), dir.path());
    server
        .put("/api/v1/preferences/embed-provider")
        .add_header(device.clone(), HeaderValue::from_static("laptop"))
        .json(&json!({ "provider": "vid_src" }))
        .await
        .assert_status_ok();
    drop(server);

    let reloaded = server_with(store, dir.path());
    let body: Value = reloaded
        .get("/api/v1/preferences/embed-provider")
        .add_header(device, HeaderValue::from_static("laptop"))
        .await
        .json();
    assert_eq!(body["provider"], "vid_src");

    let body: Value = reloaded.get("/api/v1/preferences/embed-provider").await.json();
    assert_eq!(body["provider"], "auto_embed");
}

#[tokio::test]
async fn test_watch_movie_lists_preferred_source_first() {
    let h = harness();
    let body: Value = h.server.get("/api/v1/watch/movie/27205").await.json();

    assert_eq!(body["title"], "Inception");
    assert_eq!(body["preferred"], "auto_embed");
    assert_eq!(body["sources"][0]["url"], "https://autoembed.pro/movie/27205");
    assert_eq!(body["sources"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_watch_series_clamps_episode_to_season() {
    let h = harness();
    let body: Value = h
        .server
        .get("/api/v1/watch/tv/1396?season=1&episode=40")
        .await
        .json();

    assert_eq!(body["cursor"]["episode"], 7);
    assert!(body["next"].is_null());
    assert_eq!(body["previous"]["episode"], 6);
    assert_eq!(body["seasons"].as_array().unwrap().len(), 2);
    assert_eq!(
        body["sources"][0]["url"],
        "https://autoembed.pro/tv/1396/1/7"
    );
}

#[tokio::test]
async fn test_watch_unknown_series_defaults_episode_count() {
    let h = harness();
    let body: Value = h.server.get("/api/v1/watch/tv/99?season=3").await.json();

    assert_eq!(body["cursor"]["episode_count"], 10);
    assert!(body["title"].is_null());
}

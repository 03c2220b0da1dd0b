use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

pub mod auth;
pub mod extract;
pub mod my_list;
pub mod people;
pub mod preferences;
pub mod state;
pub mod titles;
pub mod watch;

pub use state::AppState;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(axum::middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Discovery
        .route("/search", get(titles::search))
        .route("/discover", get(titles::discover))
        .route("/movies", get(titles::movies))
        .route("/trending/:kind", get(titles::trending))
        .route("/titles/:kind/:id", get(titles::details))
        .route("/titles/:kind/:id/trailers", get(titles::trailers))
        .route("/people/:id", get(people::show))
        // Playback
        .route("/watch/movie/:id", get(watch::movie))
        .route("/watch/tv/:id", get(watch::series))
        .route(
            "/preferences/embed-provider",
            get(preferences::get_embed_provider).put(preferences::set_embed_provider),
        )
        // Auth
        .route("/auth/sign-up", post(auth::sign_up))
        .route("/auth/sign-in", post(auth::sign_in))
        .route("/auth/session", post(auth::adopt_session))
        .route("/auth/sign-out", post(auth::sign_out))
        .route("/auth/reset-password", post(auth::reset_password))
        .route("/auth/update-password", post(auth::update_password))
        .route("/auth/oauth/:provider", get(auth::oauth))
        // My list
        .route("/my-list", get(my_list::index).post(my_list::add))
        .route(
            "/my-list/:kind/:id",
            get(my_list::membership).delete(my_list::remove),
        )
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use reelshelf::{
    config::{Config, ListStoreKind},
    db::{
        create_pool, create_redis_client, run_migrations, Cache, CacheWriterHandle,
        InMemoryListStore, ListStore, PgListStore,
    },
    routes::{create_router, AppState},
    services::{
        GoTrueAuthProvider, MetadataProvider, PreferenceStore, SessionRegistry, TmdbProvider,
    },
};

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("reelshelf=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let (cache, cache_writer) = match config.redis_url.as_deref() {
        Some(url) => {
            let (cache, handle) = Cache::new(create_redis_client(url)?);
            tracing::info!("Metadata cache enabled");
            (Some(cache), Some(handle))
        }
        None => {
            tracing::info!("REDIS_URL not set, metadata responses are not cached");
            (None, None)
        }
    };

    let list_store: Arc<dyn ListStore> = match config.list_store {
        ListStoreKind::Postgres => {
            let pool = create_pool(&config.database_url)
                .await
                .context("Failed to connect to Postgres")?;
            run_migrations(&pool).await?;
            Arc::new(PgListStore::new(pool))
        }
        ListStoreKind::Memory => {
            tracing::warn!("Using in-memory list store, saved lists are lost on restart");
            Arc::new(InMemoryListStore::new())
        }
    };

    let metadata = Arc::new(TmdbProvider::new(
        cache,
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
    ));
    tracing::info!(provider = metadata.name(), "Metadata provider ready");
    let auth = Arc::new(GoTrueAuthProvider::new(
        config.auth_url.clone(),
        config.auth_anon_key.clone(),
        config.site_url.clone(),
    ));
    let preferences = PreferenceStore::new(&config.preferences_dir);

    let state = AppState::new(metadata, auth, list_store, preferences);
    tokio::spawn(sweep_sessions(state.sessions.clone()));
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!(address = %address, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    flush_cache(cache_writer).await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}

async fn sweep_sessions(sessions: Arc<SessionRegistry>) {
    let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
    loop {
        interval.tick().await;
        sessions.sweep_expired().await;
    }
}

async fn flush_cache(handle: Option<CacheWriterHandle>) {
    if let Some(handle) = handle {
        handle.shutdown().await;
    }
}

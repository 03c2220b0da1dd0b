use std::fmt::Display;

use redis::{AsyncCommands, Client};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    error::{AppError, AppResult},
    models::{ContentKey, ContentKind},
};

/// Keys of cached TMDB responses
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Search { query: String, page: u32 },
    /// Discover query, keyed by its kind and encoded filter parameters
    Discover { kind: ContentKind, params: String },
    PopularMovies(u32),
    Trending(ContentKind),
    Details(ContentKey),
    Credits(ContentKey),
    Videos(ContentKey),
    Person(u64),
    PersonCredits(u64),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Search { query, page } => {
                write!(f, "search:{}:{}", query.trim().to_lowercase(), page)
            }
            CacheKey::Discover { kind, params } => write!(f, "discover:{}:{}", kind, params),
            CacheKey::PopularMovies(page) => write!(f, "popular:movie:{}", page),
            CacheKey::Trending(kind) => write!(f, "trending:{}", kind),
            CacheKey::Details(key) => write!(f, "details:{}", key),
            CacheKey::Credits(key) => write!(f, "credits:{}", key),
            CacheKey::Videos(key) => write!(f, "videos:{}", key),
            CacheKey::Person(id) => write!(f, "person:{}", id),
            CacheKey::PersonCredits(id) => write!(f, "person_credits:{}", id),
        }
    }
}

pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    Ok(Client::open(redis_url)?)
}

/// A serialized entry waiting for the writer task
struct PendingWrite {
    key: String,
    json: String,
    ttl_secs: u64,
}

/// Read-through cache of TMDB responses.
///
/// Reads hit Redis directly; writes are queued to a single writer task so a
/// slow Redis never delays a response.
#[derive(Clone)]
pub struct Cache {
    client: Client,
    writes: mpsc::UnboundedSender<PendingWrite>,
}

/// Owns the writer task; `shutdown` returns once queued writes are drained
pub struct CacheWriterHandle {
    stop: mpsc::Sender<()>,
    writer: JoinHandle<()>,
}

impl CacheWriterHandle {
    pub async fn shutdown(self) {
        if self.stop.send(()).await.is_err() {
            tracing::warn!("Cache writer already stopped");
        }
        if let Err(e) = self.writer.await {
            tracing::error!(error = %e, "Cache writer task failed");
        }
    }
}

impl Cache {
    /// Spawns the writer task; must be called inside a tokio runtime
    pub fn new(client: Client) -> (Self, CacheWriterHandle) {
        let (writes, queue) = mpsc::unbounded_channel();
        let (stop, stop_rx) = mpsc::channel(1);

        let writer = tokio::spawn(run_writer(client.clone(), queue, stop_rx));

        (Self { client, writes }, CacheWriterHandle { stop, writer })
    }

    /// `None` on a miss; a corrupt entry is an error, not a miss
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Option<String> = conn.get(key.to_string()).await?;

        raw.map(|json| {
            serde_json::from_str(&json)
                .map_err(|e| AppError::Internal(format!("Corrupt cache entry {}: {}", key, e)))
        })
        .transpose()
    }

    /// Queues a write with a TTL in seconds. Failures are logged only.
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, key = %key, "Failed to serialize cache entry");
                return;
            }
        };

        let write = PendingWrite {
            key: key.to_string(),
            json,
            ttl_secs: ttl,
        };
        if self.writes.send(write).is_err() {
            tracing::warn!(key = %key, "Cache writer stopped, dropping write");
        }
    }
}

async fn run_writer(
    client: Client,
    mut queue: mpsc::UnboundedReceiver<PendingWrite>,
    mut stop: mpsc::Receiver<()>,
) {
    loop {
        tokio::select! {
            Some(write) = queue.recv() => store(&client, write).await,
            _ = stop.recv() => break,
        }
    }

    // drain what was queued before the stop signal
    queue.close();
    let mut drained = 0usize;
    while let Some(write) = queue.recv().await {
        store(&client, write).await;
        drained += 1;
    }
    tracing::info!(drained, "Cache writer stopped");
}

async fn store(client: &Client, write: PendingWrite) {
    let result: AppResult<()> = async {
        let mut conn = client.get_multiplexed_async_connection().await?;
        conn.set_ex::<_, _, ()>(&write.key, write.json, write.ttl_secs)
            .await?;
        Ok(())
    }
    .await;

    if let Err(e) = result {
        tracing::error!(error = %e, key = %write.key, "Failed to write cache entry");
    }
}

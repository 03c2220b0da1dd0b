pub mod list_store;
pub mod postgres;
pub mod redis;

pub use list_store::{InMemoryListStore, ListStore, PgListStore};
pub use postgres::{create_pool, run_migrations};
pub use self::redis::{create_redis_client, Cache, CacheKey, CacheWriterHandle};

/// Remote List Store abstraction
///
/// The store is authoritative for every user's saved list and enforces the
/// one-row-per `(user_id, content_id, kind)` invariant. Every call is a single
/// independent request; nothing spans multiple calls.
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{ContentKey, NewSavedItem, SavedItem},
};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryListStore;
pub use postgres::PgListStore;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ListStore: Send + Sync {
    /// Composite keys of everything the user has saved
    async fn fetch_keys(&self, user_id: Uuid) -> AppResult<Vec<ContentKey>>;

    /// Full rows for the user, most recently added first
    async fn fetch_items(&self, user_id: Uuid) -> AppResult<Vec<SavedItem>>;

    /// Inserts a row; a duplicate key fails with `AppError::Constraint`
    async fn insert(&self, user_id: Uuid, item: NewSavedItem) -> AppResult<SavedItem>;

    /// Deletes the user's row for `key`
    async fn delete(&self, user_id: Uuid, key: ContentKey) -> AppResult<()>;
}

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::ListStore;
use crate::{
    error::{AppError, AppResult},
    models::{ContentKey, NewSavedItem, SavedItem},
};

/// Process-local list store for development and tests.
///
/// Enforces the same uniqueness constraint as the `my_list` table.
#[derive(Default)]
pub struct InMemoryListStore {
    rows: RwLock<HashMap<Uuid, Vec<SavedItem>>>,
}

impl InMemoryListStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows stored for a user
    pub async fn len_for(&self, user_id: Uuid) -> usize {
        self.rows
            .read()
            .await
            .get(&user_id)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

#[async_trait::async_trait]
impl ListStore for InMemoryListStore {
    async fn fetch_keys(&self, user_id: Uuid) -> AppResult<Vec<ContentKey>> {
        let rows = self.rows.read().await;
        Ok(rows
            .get(&user_id)
            .map(|items| items.iter().map(SavedItem::key).collect())
            .unwrap_or_default())
    }

    async fn fetch_items(&self, user_id: Uuid) -> AppResult<Vec<SavedItem>> {
        let rows = self.rows.read().await;
        // Rows are appended in insertion order, so reversing first keeps
        // same-timestamp rows most-recent-first after the stable sort.
        let mut items: Vec<SavedItem> = rows
            .get(&user_id)
            .map(|items| items.iter().rev().cloned().collect())
            .unwrap_or_default();
        items.sort_by(|a, b| b.added_at.cmp(&a.added_at));
        Ok(items)
    }

    async fn insert(&self, user_id: Uuid, item: NewSavedItem) -> AppResult<SavedItem> {
        let mut rows = self.rows.write().await;
        let items = rows.entry(user_id).or_default();

        let key = item.key();
        if items.iter().any(|existing| existing.key() == key) {
            return Err(AppError::Constraint(format!(
                "duplicate key value violates unique constraint for {}",
                key
            )));
        }

        let saved = item.into_saved(user_id, Utc::now());
        items.push(saved.clone());
        Ok(saved)
    }

    async fn delete(&self, user_id: Uuid, key: ContentKey) -> AppResult<()> {
        let mut rows = self.rows.write().await;
        if let Some(items) = rows.get_mut(&user_id) {
            items.retain(|existing| existing.key() != key);
        }
        Ok(())
    }
}

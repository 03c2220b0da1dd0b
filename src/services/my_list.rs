/// Personal list membership cache and mutation façade
///
/// `MyList` answers "is this saved?" from memory and routes every mutation
/// through the remote store first. The cache is only touched after the store
/// confirms, so a failed call leaves membership exactly as it was.
use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

use uuid::Uuid;

use crate::{
    db::ListStore,
    error::{AppError, AppResult},
    models::{ContentKey, ContentKind, NewSavedItem, Notification, SavedItem},
};

/// In-memory mirror of a user's saved composite keys
#[derive(Debug, Default)]
pub struct MembershipCache {
    keys: RwLock<HashSet<ContentKey>>,
}

impl MembershipCache {
    pub fn contains(&self, key: &ContentKey) -> bool {
        self.keys
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }

    fn insert(&self, key: ContentKey) {
        self.keys
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key);
    }

    fn remove(&self, key: &ContentKey) {
        self.keys
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }

    fn replace(&self, keys: impl IntoIterator<Item = ContentKey>) {
        let mut guard = self.keys.write().unwrap_or_else(PoisonError::into_inner);
        guard.clear();
        guard.extend(keys);
    }

    fn clear(&self) {
        self.keys
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.keys.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// How a mutation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The store confirmed and the cache was updated
    Applied,
    /// Refused before any store call (no session)
    Refused,
    /// The store call failed; the cache was left untouched
    Failed,
}

/// Result of `add`/`remove`: what happened plus the one notification for the user
#[derive(Debug, Clone, PartialEq)]
pub struct ListMutation {
    pub outcome: MutationOutcome,
    pub notification: Notification,
}

impl ListMutation {
    fn new(outcome: MutationOutcome, notification: Notification) -> Self {
        Self {
            outcome,
            notification,
        }
    }
}

/// A session's view of its saved list
pub struct MyList {
    store: Arc<dyn ListStore>,
    user_id: Option<Uuid>,
    cache: MembershipCache,
}

impl MyList {
    /// A list with no signed-in user: membership is always false and
    /// mutations are refused without reaching the store.
    pub fn anonymous(store: Arc<dyn ListStore>) -> Self {
        Self {
            store,
            user_id: None,
            cache: MembershipCache::default(),
        }
    }

    /// Builds the user's list and loads its keys from the store
    pub async fn for_user(store: Arc<dyn ListStore>, user_id: Uuid) -> Self {
        let list = Self {
            store,
            user_id: Some(user_id),
            cache: MembershipCache::default(),
        };
        list.initialize().await;
        list
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.user_id
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    /// Bulk-loads the user's keys into the cache.
    ///
    /// A fetch failure is logged and leaves the cache empty; membership then
    /// reports false negatives until the next session.
    pub async fn initialize(&self) {
        let Some(user_id) = self.user_id else {
            return;
        };

        match self.store.fetch_keys(user_id).await {
            Ok(keys) => {
                self.cache.replace(keys);
                tracing::info!(
                    user_id = %user_id,
                    items = self.cache.len(),
                    "Loaded my list"
                );
            }
            Err(e) => {
                tracing::error!(error = %e, user_id = %user_id, "Error fetching my list");
            }
        }
    }

    /// Cache-only membership test
    pub fn is_member(&self, content_id: u64, kind: ContentKind) -> bool {
        self.cache.contains(&ContentKey::new(content_id, kind))
    }

    /// Saves an item for the signed-in user.
    ///
    /// Always yields exactly one notification. Not retried or coalesced: a
    /// second concurrent add of the same key fails on the store's uniqueness
    /// constraint and is reported like any other failure.
    pub async fn add(&self, item: NewSavedItem) -> ListMutation {
        let Some(user_id) = self.user_id else {
            tracing::debug!(key = %item.key(), "Add to my list refused without session");
            return ListMutation::new(MutationOutcome::Refused, Notification::sign_in_required());
        };

        let key = item.key();
        match self.store.insert(user_id, item).await {
            Ok(saved) => {
                self.cache.insert(key);
                tracing::info!(user_id = %user_id, key = %key, "Added to my list");
                ListMutation::new(MutationOutcome::Applied, Notification::added(&saved.title))
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    user_id = %user_id,
                    key = %key,
                    "Error adding to my list"
                );
                ListMutation::new(MutationOutcome::Failed, Notification::add_failed())
            }
        }
    }

    /// Removes an item; a no-op returning `None` without a session
    pub async fn remove(&self, content_id: u64, kind: ContentKind) -> Option<ListMutation> {
        let user_id = self.user_id?;
        let key = ContentKey::new(content_id, kind);

        let mutation = match self.store.delete(user_id, key).await {
            Ok(()) => {
                self.cache.remove(&key);
                tracing::info!(user_id = %user_id, key = %key, "Removed from my list");
                ListMutation::new(MutationOutcome::Applied, Notification::removed())
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    user_id = %user_id,
                    key = %key,
                    "Error removing from my list"
                );
                ListMutation::new(MutationOutcome::Failed, Notification::remove_failed())
            }
        };

        Some(mutation)
    }

    /// Full saved rows for the "My List" page, newest first
    pub async fn items(&self) -> AppResult<Vec<SavedItem>> {
        let user_id = self
            .user_id
            .ok_or_else(|| AppError::Unauthorized("Sign in to view your list".to_string()))?;
        self.store.fetch_items(user_id).await
    }

    /// Drops every cached key; called when the session ends
    pub fn clear(&self) {
        self.cache.clear();
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::{db::ListStore, services::auth::Session, services::my_list::MyList};

struct SessionEntry {
    list: Arc<MyList>,
    /// `None` when the provider gave no lifetime
    expires_at: Option<Instant>,
}

impl SessionEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// Live sessions, keyed by access token.
///
/// Each signed-in session owns one `MyList`, built and loaded on sign-in and
/// cleared on sign-out or once the token's lifetime runs out. Requests
/// without a live token get an anonymous list.
pub struct SessionRegistry {
    store: Arc<dyn ListStore>,
    sessions: RwLock<HashMap<String, SessionEntry>>,
}

impl SessionRegistry {
    pub fn new(store: Arc<dyn ListStore>) -> Self {
        Self {
            store,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a new session and bulk-loads its list
    pub async fn establish(&self, session: &Session) -> Arc<MyList> {
        let list = Arc::new(MyList::for_user(self.store.clone(), session.user.id).await);
        let entry = SessionEntry {
            list: list.clone(),
            expires_at: session
                .expires_in
                .map(|secs| Instant::now() + Duration::from_secs(secs)),
        };

        let previous = self
            .sessions
            .write()
            .await
            .insert(session.access_token.clone(), entry);

        if let Some(previous) = previous {
            previous.list.clear();
        }

        tracing::info!(user_id = %session.user.id, "Session established");
        list
    }

    /// The list of a live session; an expired entry is evicted on sight
    pub async fn get(&self, access_token: &str) -> Option<Arc<MyList>> {
        let now = Instant::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(access_token) {
                None => return None,
                Some(entry) if !entry.is_expired(now) => return Some(entry.list.clone()),
                Some(_) => {}
            }
        }

        let mut sessions = self.sessions.write().await;
        if sessions
            .get(access_token)
            .is_some_and(|entry| entry.is_expired(now))
        {
            if let Some(entry) = sessions.remove(access_token) {
                entry.list.clear();
                tracing::info!(user_id = ?entry.list.user_id(), "Session expired");
            }
        }
        None
    }

    /// The session's list, or an anonymous one for unknown, expired or missing tokens
    pub async fn list_for(&self, access_token: Option<&str>) -> Arc<MyList> {
        if let Some(token) = access_token {
            if let Some(list) = self.get(token).await {
                return list;
            }
        }
        Arc::new(MyList::anonymous(self.store.clone()))
    }

    /// Drops every expired session; returns how many were evicted
    pub async fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        sessions.retain(|_, entry| {
            if entry.is_expired(now) {
                entry.list.clear();
                false
            } else {
                true
            }
        });

        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!(evicted, "Swept expired sessions");
        }
        evicted
    }

    /// Ends a session; returns false if the token was unknown
    pub async fn teardown(&self, access_token: &str) -> bool {
        match self.sessions.write().await.remove(access_token) {
            Some(entry) => {
                entry.list.clear();
                tracing::info!(user_id = ?entry.list.user_id(), "Session torn down");
                true
            }
            None => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

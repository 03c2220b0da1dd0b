use std::sync::Arc;

use crate::{
    db::ListStore,
    services::{
        AuthProvider, AuthService, MetadataProvider, PreferenceStore, SessionRegistry,
    },
};

/// Shared handler state; every field is cheap to clone
#[derive(Clone)]
pub struct AppState {
    pub metadata: Arc<dyn MetadataProvider>,
    pub auth: AuthService,
    pub sessions: Arc<SessionRegistry>,
    pub preferences: Arc<PreferenceStore>,
}

impl AppState {
    pub fn new(
        metadata: Arc<dyn MetadataProvider>,
        auth_provider: Arc<dyn AuthProvider>,
        list_store: Arc<dyn ListStore>,
        preferences: PreferenceStore,
    ) -> Self {
        Self {
            metadata,
            auth: AuthService::new(auth_provider),
            sessions: Arc::new(SessionRegistry::new(list_store)),
            preferences: Arc::new(preferences),
        }
    }
}

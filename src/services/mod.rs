pub mod auth;
pub mod discovery;
pub mod embed;
pub mod my_list;
pub mod providers;
pub mod sessions;

pub use auth::{AuthProvider, AuthService, GoTrueAuthProvider, Session};
pub use embed::{EmbedProvider, EpisodeCursor, PreferenceStore};
pub use my_list::{ListMutation, MutationOutcome, MyList};
pub use providers::{MetadataProvider, TmdbProvider};
pub use sessions::SessionRegistry;

use std::sync::Arc;

use crate::db::DbPool;
use crate::wishes::store::WishStore;
use crate::ws::ConnectionRegistry;

/// Shared application state passed to all handlers via axum State extractor.
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection wrapped in Arc<Mutex> (capsules, quotes, poll counters)
    pub db: DbPool,
    /// Rolling in-memory wish store
    pub wishes: Arc<WishStore>,
    /// Active push connections
    pub connections: ConnectionRegistry,
    /// Seconds a push connection may stay open
    pub session_timeout_secs: u64,
    /// Maximum wish message length in characters
    pub max_message_chars: usize,
    /// Count cap on stored wishes; also the cap on recent-wish queries
    pub max_wishes: usize,
    /// Allowed cross-origin callers, comma-separated ("*" = unrestricted)
    pub cors_origins: String,
}

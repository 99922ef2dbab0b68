pub mod actor;
pub mod broadcast;
pub mod handler;

use axum::extract::ws::Message;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// RFC 6455 close code 1001 "Going Away": session timeout or shutdown.
pub const CLOSE_GOING_AWAY: u16 = 1001;

/// Type alias for the sender half of a push connection's channel.
/// Other parts of the system can clone this to push messages to the client.
pub type ConnectionSender = mpsc::UnboundedSender<Message>;

/// Server-side bookkeeping for one live push connection.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    pub sender: ConnectionSender,
    /// When the connection was registered; anchors the session deadline.
    pub connected_at: DateTime<Utc>,
}

/// Connection registry: every currently-live push connection, keyed by a
/// process-unique id. Arc<DashMap<ConnectionId, ConnectionHandle>>
pub type ConnectionRegistry = Arc<DashMap<u64, ConnectionHandle>>;

/// Create a new empty connection registry.
pub fn new_connection_registry() -> ConnectionRegistry {
    Arc::new(DashMap::new())
}

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Add a connection to the registry, returning its id.
/// Each handshake yields a distinct id, so duplicates cannot collide.
pub fn register(registry: &ConnectionRegistry, sender: ConnectionSender) -> u64 {
    let id = NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed);
    registry.insert(
        id,
        ConnectionHandle {
            sender,
            connected_at: Utc::now(),
        },
    );
    id
}

/// Remove a connection if present. No-op when absent, so the send-failure
/// cleanup and the lifecycle exit path can both call it.
pub fn unregister(registry: &ConnectionRegistry, id: u64) {
    registry.remove(&id);
}

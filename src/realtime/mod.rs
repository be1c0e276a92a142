//! Real-time fan-out: in-memory subscription registry plus best-effort
//! delivery of persisted events to live WebSocket connections.
//!
//! Everything here is process-local. Restart drops all subscriptions; a
//! client that connects after an event was published misses it permanently.
//! The persisted rows are the audit trail, not this layer.

pub mod broadcaster;
pub mod protocol;
pub mod registry;

use uuid::Uuid;

/// Identity of one live WebSocket connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

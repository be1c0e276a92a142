use std::sync::Arc;

use sqlx::PgPool;

use crate::realtime::broadcaster::Broadcaster;

/// Shared application state, injected into every handler.
///
/// The broadcaster is constructed once at startup and handed to handlers
/// here rather than through a global, so tests can build a state around a
/// fresh registry with fake connections.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub broadcaster: Arc<Broadcaster>,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            broadcaster: Arc::new(Broadcaster::new()),
        }
    }
}

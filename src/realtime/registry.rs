//! In-memory index from match id (or the global feed) to the connections
//! currently interested in it.

use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::ConnectionId;

/// What a connection wants pushed to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interest {
    /// Commentary for one match. The match does not have to exist yet.
    Match(i32),
    /// Every newly created match.
    AllMatches,
}

#[derive(Debug, Default)]
struct Inner {
    by_match: HashMap<i32, HashSet<ConnectionId>>,
    all_matches: HashSet<ConnectionId>,
    /// Reverse index, so removing a connection touches only the matches it
    /// was subscribed to.
    interests: HashMap<ConnectionId, HashSet<i32>>,
}

/// Registry of live subscriptions. Process-local, rebuilt empty on restart.
///
/// Mutations never hold the lock across an await point; fan-out snapshots
/// the subscriber set and releases the lock before any delivery starts.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    inner: RwLock<Inner>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        match self.inner.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Registers interest. Idempotent: subscribing twice to the same target
    /// is one registration.
    pub fn subscribe(&self, connection: ConnectionId, interest: Interest) {
        let mut inner = self.write();
        match interest {
            Interest::Match(match_id) => {
                inner.by_match.entry(match_id).or_default().insert(connection);
                inner.interests.entry(connection).or_default().insert(match_id);
            }
            Interest::AllMatches => {
                inner.all_matches.insert(connection);
            }
        }
    }

    /// Removes one registration; no-op when it was never made.
    pub fn unsubscribe(&self, connection: ConnectionId, interest: Interest) {
        let mut inner = self.write();
        match interest {
            Interest::Match(match_id) => {
                if let Some(subscribers) = inner.by_match.get_mut(&match_id) {
                    subscribers.remove(&connection);
                    if subscribers.is_empty() {
                        inner.by_match.remove(&match_id);
                    }
                }
                if let Some(matches) = inner.interests.get_mut(&connection) {
                    matches.remove(&match_id);
                    if matches.is_empty() {
                        inner.interests.remove(&connection);
                    }
                }
            }
            Interest::AllMatches => {
                inner.all_matches.remove(&connection);
            }
        }
    }

    /// Drops every registration for a connection. Called once per connection
    /// lifetime, on close or unrecoverable error; afterwards the registry
    /// holds nothing for it.
    pub fn remove_connection(&self, connection: ConnectionId) {
        let mut inner = self.write();
        if let Some(matches) = inner.interests.remove(&connection) {
            for match_id in matches {
                if let Some(subscribers) = inner.by_match.get_mut(&match_id) {
                    subscribers.remove(&connection);
                    if subscribers.is_empty() {
                        inner.by_match.remove(&match_id);
                    }
                }
            }
        }
        inner.all_matches.remove(&connection);
    }

    /// Snapshot of the connections following one match.
    pub fn subscribers_for(&self, match_id: i32) -> Vec<ConnectionId> {
        self.read()
            .by_match
            .get(&match_id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Snapshot of the connections following the global feed.
    pub fn all_subscribers(&self) -> Vec<ConnectionId> {
        self.read().all_matches.iter().copied().collect()
    }

    #[cfg(test)]
    fn tracked_matches(&self) -> usize {
        self.read().by_match.len()
    }
}

//! Fan-out engine: translates persisted domain events into wire messages and
//! pushes them to the interested connections.
//!
//! Delivery is best-effort, at-most-once, no backlog. Publishing runs only
//! after the corresponding row is committed, and a publish failure is never
//! surfaced to the HTTP caller.

use std::collections::HashMap;
use std::sync::RwLock;

use tokio::sync::mpsc;

use super::protocol::ServerMessage;
use super::registry::{Interest, SubscriptionRegistry};
use super::ConnectionId;

/// Outbound channel for one connection
pub type EventSender = mpsc::UnboundedSender<ServerMessage>;

/// Receiving side, owned by the connection's socket task
pub type EventReceiver = mpsc::UnboundedReceiver<ServerMessage>;

/// Per-publish accounting, for the log line only. There is no retry and no
/// delivery acknowledgment.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Subscribers in the snapshot when the publish started
    pub matched: usize,
    /// Sends that were accepted by a live channel
    pub delivered: usize,
    /// Connections that were gone or already closing
    pub failed: usize,
}

#[derive(Debug, Default)]
pub struct Broadcaster {
    connections: RwLock<HashMap<ConnectionId, EventSender>>,
    registry: SubscriptionRegistry,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    fn connections_write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<ConnectionId, EventSender>> {
        match self.connections.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Registers a connection and hands back the receiving end of its
    /// outbound channel.
    pub fn connect(&self, connection: ConnectionId) -> EventReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        self.connections_write().insert(connection, tx);
        rx
    }

    /// Tears a connection down: drops its sender and every subscription.
    /// Called exactly once, when the socket closes or errors.
    pub fn disconnect(&self, connection: ConnectionId) {
        self.registry.remove_connection(connection);
        self.connections_write().remove(&connection);
    }

    pub fn subscribe(&self, connection: ConnectionId, interest: Interest) {
        self.registry.subscribe(connection, interest);
    }

    pub fn unsubscribe(&self, connection: ConnectionId, interest: Interest) {
        self.registry.unsubscribe(connection, interest);
    }

    /// Pushes a freshly created match to every global-feed subscriber.
    pub fn publish_match_created(&self, match_row: &crate::models::matches::Match) -> DeliveryReport {
        let report = self.send_to(
            self.registry.all_subscribers(),
            ServerMessage::MatchCreated {
                data: match_row.clone(),
            },
        );
        tracing::debug!(
            match_id = match_row.id,
            matched = report.matched,
            delivered = report.delivered,
            failed = report.failed,
            "published match_created"
        );
        report
    }

    /// Pushes a commentary entry to every subscriber of its match. With no
    /// subscribers the event is simply dropped.
    pub fn publish_commentary(
        &self,
        match_id: i32,
        entry: &crate::models::commentary::CommentaryEntry,
    ) -> DeliveryReport {
        let report = self.send_to(
            self.registry.subscribers_for(match_id),
            ServerMessage::Commentary {
                match_id,
                data: entry.clone(),
            },
        );
        tracing::debug!(
            match_id,
            matched = report.matched,
            delivered = report.delivered,
            failed = report.failed,
            "published commentary"
        );
        report
    }

    /// Delivers one message to a point-in-time snapshot of subscribers.
    ///
    /// The sender clones are taken under the lock, the sends happen outside
    /// it, so a connection unsubscribing mid-broadcast lands cleanly on one
    /// side of the snapshot. One dead connection never stops the rest.
    fn send_to(&self, targets: Vec<ConnectionId>, message: ServerMessage) -> DeliveryReport {
        let mut report = DeliveryReport {
            matched: targets.len(),
            ..Default::default()
        };

        let senders: Vec<(ConnectionId, EventSender)> = {
            let connections = match self.connections.read() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            targets
                .iter()
                .filter_map(|id| connections.get(id).map(|tx| (*id, tx.clone())))
                .collect()
        };

        // Subscribers whose sender is already gone (disconnect raced the
        // snapshot) count as failed.
        report.failed = report.matched - senders.len();

        for (connection, tx) in senders {
            match tx.send(message.clone()) {
                Ok(()) => report.delivered += 1,
                Err(_) => {
                    tracing::warn!(%connection, "dropping event for closed connection");
                    report.failed += 1;
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::models::commentary::CommentaryEntry;
    use crate::models::matches::{Match, MatchStatus};

    fn sample_match(id: i32) -> Match {
        Match {
            id,
            sport: "soccer".to_string(),
            home_team: "A".to_string(),
            away_team: "B".to_string(),
            status: MatchStatus::Live,
            start_time: Utc::now(),
            end_time: None,
            home_score: 0,
            away_score: 0,
            created_at: Utc::now(),
        }
    }

    fn sample_entry(id: i32, match_id: i32) -> CommentaryEntry {
        CommentaryEntry {
            id,
            match_id,
            minute: 5,
            sequence: None,
            period: None,
            event_type: Some("goal".to_string()),
            actor: None,
            team: Some("A".to_string()),
            message: Some("Goal!".to_string()),
            metadata: None,
            tags: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn commentary_reaches_only_that_matchs_subscribers() {
        let broadcaster = Broadcaster::new();

        let watcher = ConnectionId::new();
        let mut watcher_rx = broadcaster.connect(watcher);
        broadcaster.subscribe(watcher, Interest::Match(7));

        let bystander = ConnectionId::new();
        let mut bystander_rx = broadcaster.connect(bystander);
        broadcaster.subscribe(bystander, Interest::Match(8));

        let report = broadcaster.publish_commentary(7, &sample_entry(1, 7));
        assert_eq!(report.matched, 1);
        assert_eq!(report.delivered, 1);
        assert_eq!(report.failed, 0);

        match watcher_rx.try_recv().unwrap() {
            ServerMessage::Commentary { match_id, data } => {
                assert_eq!(match_id, 7);
                assert_eq!(data.minute, 5);
                assert_eq!(data.message.as_deref(), Some("Goal!"));
            }
            other => panic!("unexpected message: {other:?}"),
        }
        assert!(bystander_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn exactly_one_push_per_entry() {
        let broadcaster = Broadcaster::new();
        let conn = ConnectionId::new();
        let mut rx = broadcaster.connect(conn);
        // Double subscribe must not double deliver.
        broadcaster.subscribe(conn, Interest::Match(7));
        broadcaster.subscribe(conn, Interest::Match(7));

        broadcaster.publish_commentary(7, &sample_entry(1, 7));

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn match_created_goes_to_the_all_set() {
        let broadcaster = Broadcaster::new();

        let dashboard = ConnectionId::new();
        let mut dashboard_rx = broadcaster.connect(dashboard);
        broadcaster.subscribe(dashboard, Interest::AllMatches);

        let single = ConnectionId::new();
        let mut single_rx = broadcaster.connect(single);
        broadcaster.subscribe(single, Interest::Match(1));

        let report = broadcaster.publish_match_created(&sample_match(1));
        assert_eq!(report.delivered, 1);

        assert!(matches!(
            dashboard_rx.try_recv().unwrap(),
            ServerMessage::MatchCreated { .. }
        ));
        // A per-match subscription is not a global-feed subscription.
        assert!(single_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn dead_connection_does_not_block_the_rest() {
        let broadcaster = Broadcaster::new();

        let dead = ConnectionId::new();
        let dead_rx = broadcaster.connect(dead);
        broadcaster.subscribe(dead, Interest::Match(7));
        drop(dead_rx);

        let alive = ConnectionId::new();
        let mut alive_rx = broadcaster.connect(alive);
        broadcaster.subscribe(alive, Interest::Match(7));

        let report = broadcaster.publish_commentary(7, &sample_entry(1, 7));
        assert_eq!(report.matched, 2);
        assert_eq!(report.delivered, 1);
        assert_eq!(report.failed, 1);
        assert!(alive_rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn nobody_watching_drops_the_event() {
        let broadcaster = Broadcaster::new();
        let report = broadcaster.publish_commentary(7, &sample_entry(1, 7));
        assert_eq!(report, DeliveryReport::default());
    }

    #[tokio::test]
    async fn disconnect_stops_further_pushes() {
        let broadcaster = Broadcaster::new();
        let conn = ConnectionId::new();
        let mut rx = broadcaster.connect(conn);
        broadcaster.subscribe(conn, Interest::Match(7));
        broadcaster.subscribe(conn, Interest::AllMatches);

        broadcaster.disconnect(conn);

        let report = broadcaster.publish_commentary(7, &sample_entry(1, 7));
        assert_eq!(report.matched, 0);
        let report = broadcaster.publish_match_created(&sample_match(1));
        assert_eq!(report.matched, 0);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn unsubscribe_stops_pushes_for_that_match_only() {
        let broadcaster = Broadcaster::new();
        let conn = ConnectionId::new();
        let mut rx = broadcaster.connect(conn);
        broadcaster.subscribe(conn, Interest::Match(7));
        broadcaster.subscribe(conn, Interest::Match(8));

        broadcaster.unsubscribe(conn, Interest::Match(7));

        broadcaster.publish_commentary(7, &sample_entry(1, 7));
        broadcaster.publish_commentary(8, &sample_entry(2, 8));

        match rx.try_recv().unwrap() {
            ServerMessage::Commentary { match_id, .. } => assert_eq!(match_id, 8),
            other => panic!("unexpected message: {other:?}"),
        }
        assert!(rx.try_recv().is_err());
    }
}

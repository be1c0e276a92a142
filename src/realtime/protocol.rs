//! Wire messages for the `/ws` endpoint. JSON with an internal `type` tag.

use serde::{Deserialize, Serialize};

use crate::models::commentary::CommentaryEntry;
use crate::models::matches::Match;

/// Message from client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Follow one match's commentary
    Subscribe { match_id: i32 },

    /// Stop following one match
    Unsubscribe { match_id: i32 },

    /// Follow the global feed of newly created matches
    SubscribeAll,

    /// Leave the global feed
    UnsubscribeAll,

    /// Liveness probe
    Ping,
}

/// Message to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Subscription confirmed; `match_id` is absent for the global feed
    Subscribed { match_id: Option<i32> },

    /// Unsubscription confirmed
    Unsubscribed { match_id: Option<i32> },

    /// A match was just created
    MatchCreated { data: Match },

    /// A commentary entry was posted to a followed match
    Commentary { match_id: i32, data: CommentaryEntry },

    /// Ping response
    Pong,

    /// Error reply; the connection stays open
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_subscribe() {
        let json = r#"{"type": "subscribe", "match_id": 7}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        match msg {
            ClientMessage::Subscribe { match_id } => assert_eq!(match_id, 7),
            _ => panic!("wrong message type"),
        }
    }

    #[test]
    fn parses_subscribe_all() {
        let json = r#"{"type": "subscribe_all"}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        assert!(matches!(msg, ClientMessage::SubscribeAll));
    }

    #[test]
    fn rejects_unknown_type() {
        let json = r#"{"type": "replay", "match_id": 7}"#;
        assert!(serde_json::from_str::<ClientMessage>(json).is_err());
    }

    #[test]
    fn serializes_commentary_push_with_match_id() {
        let entry: CommentaryEntry = serde_json::from_value(serde_json::json!({
            "id": 1,
            "matchId": 7,
            "minute": 5,
            "sequence": null,
            "period": null,
            "eventType": "goal",
            "actor": null,
            "team": "A",
            "message": "Goal!",
            "metadata": null,
            "tags": null,
            "createdAt": "2025-01-01T10:05:00Z",
        }))
        .unwrap();

        let json = serde_json::to_value(ServerMessage::Commentary {
            match_id: 7,
            data: entry,
        })
        .unwrap();

        assert_eq!(json["type"], "commentary");
        assert_eq!(json["match_id"], 7);
        assert_eq!(json["data"]["minute"], 5);
        assert_eq!(json["data"]["message"], "Goal!");
    }

    #[test]
    fn serializes_error_with_snake_case_tag() {
        let json =
            serde_json::to_string(&ServerMessage::Error { message: "bad frame".into() }).unwrap();
        assert!(json.contains(r#""type":"error""#));
    }
}

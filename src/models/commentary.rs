use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single timestamped commentary item attached to a match.
///
/// Immutable once inserted; listed newest-first per match.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CommentaryEntry {
    pub id: i32,
    pub match_id: i32,
    pub minute: i32,
    pub sequence: Option<i32>,
    pub period: Option<i32>,
    pub event_type: Option<String>,
    pub actor: Option<String>,
    pub team: Option<String>,
    pub message: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub tags: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

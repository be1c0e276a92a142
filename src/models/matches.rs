use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Match lifecycle status, stored as the Postgres enum `match_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "match_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Scheduled,
    Live,
    Finished,
}

impl MatchStatus {
    /// Computes the status from the schedule at a given instant.
    ///
    /// This runs once at creation time; a stored status is never re-derived
    /// as the clock advances. A match with no end time that has already
    /// started counts as live.
    pub fn from_schedule(
        now: DateTime<Utc>,
        start_time: DateTime<Utc>,
        end_time: Option<DateTime<Utc>>,
    ) -> Self {
        if now < start_time {
            return MatchStatus::Scheduled;
        }
        match end_time {
            Some(end) if now >= end => MatchStatus::Finished,
            _ => MatchStatus::Live,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: i32,
    pub sport: String,
    pub home_team: String,
    pub away_team: String,
    pub status: MatchStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub home_score: i32,
    pub away_score: i32,
    pub created_at: DateTime<Utc>,
}

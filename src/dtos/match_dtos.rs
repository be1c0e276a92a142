use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use super::MAX_LIMIT;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatchRequest {
    #[validate(length(min = 1, message = "sport is required"))]
    pub sport: String,

    #[validate(length(min = 1, message = "homeTeam is required"))]
    pub home_team: String,

    #[validate(length(min = 1, message = "awayTeam is required"))]
    pub away_team: String,

    pub start_time: DateTime<Utc>,

    pub end_time: Option<DateTime<Utc>>,

    #[validate(range(min = 0, message = "homeScore must be non-negative"))]
    pub home_score: Option<i32>,

    #[validate(range(min = 0, message = "awayScore must be non-negative"))]
    pub away_score: Option<i32>,
}

impl CreateMatchRequest {
    /// Cross-field check the derive can't express: endTime, when present,
    /// must be strictly after startTime.
    pub fn has_valid_schedule(&self) -> bool {
        match self.end_time {
            Some(end) => end > self.start_time,
            None => true,
        }
    }
}

/// Score update payload. Validated shape only; no write endpoint uses it in
/// the current scope.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct UpdateScoreRequest {
    #[validate(range(min = 0, message = "homeScore must be non-negative"))]
    pub home_score: i32,

    #[validate(range(min = 0, message = "awayScore must be non-negative"))]
    pub away_score: i32,
}

#[derive(Debug, Deserialize)]
pub struct ListMatchesQuery {
    pub limit: Option<i64>,
}

impl ListMatchesQuery {
    pub fn effective_limit(&self) -> i64 {
        self.limit.unwrap_or(50).clamp(1, MAX_LIMIT)
    }
}

use serde::Deserialize;
use validator::Validate;

use super::MAX_LIMIT;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentaryRequest {
    #[validate(range(min = 0, message = "minute must be non-negative"))]
    pub minute: i32,

    pub sequence: Option<i32>,

    pub period: Option<i32>,

    pub event_type: Option<String>,

    pub actor: Option<String>,

    pub team: Option<String>,

    pub message: Option<String>,

    pub metadata: Option<serde_json::Value>,

    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct ListCommentaryQuery {
    pub limit: Option<i64>,
}

impl ListCommentaryQuery {
    pub fn effective_limit(&self) -> i64 {
        self.limit.unwrap_or(100).clamp(1, MAX_LIMIT)
    }
}

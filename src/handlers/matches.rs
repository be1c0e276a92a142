use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use validator::Validate;

use crate::dtos::match_dtos::{CreateMatchRequest, ListMatchesQuery};
use crate::errors::{AppError, Result};
use crate::models::matches::{Match, MatchStatus};
use crate::state::AppState;

// GET /matches
pub async fn list_matches(
    State(state): State<AppState>,
    Query(query): Query<ListMatchesQuery>,
) -> Result<Json<Value>> {
    let matches: Vec<Match> =
        sqlx::query_as("SELECT * FROM matches ORDER BY created_at DESC LIMIT $1")
            .bind(query.effective_limit())
            .fetch_all(&state.pool)
            .await?;

    Ok(Json(json!({ "data": matches })))
}

// POST /matches
pub async fn create_match(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>)> {
    // Parse at the boundary so a malformed payload is a 400, same as any
    // other validation failure.
    let payload: CreateMatchRequest = serde_json::from_value(body)
        .map_err(|err| AppError::validation(format!("invalid payload: {err}")))?;
    payload.validate()?;
    if !payload.has_valid_schedule() {
        return Err(AppError::validation("endTime must be after startTime"));
    }

    // Status is derived from the clock once, here. It is never re-evaluated
    // as the match progresses; clients poll or subscribe for fresh data.
    let status = MatchStatus::from_schedule(Utc::now(), payload.start_time, payload.end_time);

    let match_row: Match = sqlx::query_as(
        "INSERT INTO matches \
             (sport, home_team, away_team, status, start_time, end_time, home_score, away_score) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         RETURNING *",
    )
    .bind(&payload.sport)
    .bind(&payload.home_team)
    .bind(&payload.away_team)
    .bind(status)
    .bind(payload.start_time)
    .bind(payload.end_time)
    .bind(payload.home_score.unwrap_or(0))
    .bind(payload.away_score.unwrap_or(0))
    .fetch_one(&state.pool)
    .await?;

    tracing::info!(match_id = match_row.id, status = ?match_row.status, "created match");

    // Best-effort push to the global feed. The row is already committed, so
    // delivery problems never affect this response.
    state.broadcaster.publish_match_created(&match_row);

    Ok((StatusCode::CREATED, Json(json!({ "data": match_row }))))
}

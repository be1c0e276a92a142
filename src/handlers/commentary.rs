use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};
use validator::Validate;

use crate::dtos::commentary_dtos::{CreateCommentaryRequest, ListCommentaryQuery};
use crate::errors::{AppError, Result};
use crate::models::commentary::CommentaryEntry;
use crate::state::AppState;

// GET /matches/:id/commentary
pub async fn list_commentary(
    State(state): State<AppState>,
    Path(match_id): Path<i32>,
    Query(query): Query<ListCommentaryQuery>,
) -> Result<Json<Value>> {
    let entries: Vec<CommentaryEntry> = sqlx::query_as(
        "SELECT * FROM commentary WHERE match_id = $1 ORDER BY created_at DESC LIMIT $2",
    )
    .bind(match_id)
    .bind(query.effective_limit())
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(json!({ "data": entries })))
}

// POST /matches/:id/commentary
pub async fn create_commentary(
    State(state): State<AppState>,
    Path(match_id): Path<i32>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>)> {
    let payload: CreateCommentaryRequest = serde_json::from_value(body)
        .map_err(|err| AppError::validation(format!("invalid payload: {err}")))?;
    payload.validate()?;

    // Pre-check so a missing match reads as a 404 before we touch the
    // commentary table. A concurrent delete would still be caught by the
    // foreign key, which errors.rs maps to the same 404.
    let match_exists: Option<(i32,)> = sqlx::query_as("SELECT id FROM matches WHERE id = $1")
        .bind(match_id)
        .fetch_optional(&state.pool)
        .await?;
    if match_exists.is_none() {
        return Err(AppError::MatchNotFound);
    }

    let entry: CommentaryEntry = sqlx::query_as(
        "INSERT INTO commentary \
             (match_id, minute, sequence, period, event_type, actor, team, message, metadata, tags) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         RETURNING *",
    )
    .bind(match_id)
    .bind(payload.minute)
    .bind(payload.sequence)
    .bind(payload.period)
    .bind(&payload.event_type)
    .bind(&payload.actor)
    .bind(&payload.team)
    .bind(&payload.message)
    .bind(&payload.metadata)
    .bind(&payload.tags)
    .fetch_one(&state.pool)
    .await?;

    tracing::info!(match_id, entry_id = entry.id, "created commentary entry");

    // Row is committed; push to whoever is watching this match right now.
    state.broadcaster.publish_commentary(match_id, &entry);

    Ok((StatusCode::CREATED, Json(json!({ "data": entry }))))
}

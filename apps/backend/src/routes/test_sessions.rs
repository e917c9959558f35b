//! Test mode endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use matching_core::SelectionError;
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;
use crate::routes::subjects::load_deck;
use crate::services::sessions::lock_session;
use crate::AppState;

/// POST /api/test-sessions
pub async fn start(
    State(state): State<AppState>,
    Json(payload): Json<StartTestRequest>,
) -> Result<(StatusCode, Json<TestSessionResponse>)> {
    let params = payload.params(state.config.default_params);
    let deck = load_deck(&state, &payload.subject).await?;

    let session =
        state
            .sessions
            .create(Subject::new(payload.subject), deck, params, &state.config)?;
    let mut guard = lock_session(&session)?;

    tracing::info!(
        "Started test session {} for {} ({} pairs, {} distractors)",
        guard.id,
        guard.subject.id,
        params.matching_pairs,
        params.distractor_count
    );

    Ok((StatusCode::CREATED, Json(guard.response()?)))
}

/// GET /api/test-sessions/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TestSessionResponse>> {
    let session = state.sessions.get(id)?;
    let mut guard = lock_session(&session)?;
    Ok(Json(guard.response()?))
}

/// POST /api/test-sessions/{id}/click
pub async fn click(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ClickRequest>,
) -> Result<Json<ClickResponse>> {
    let session = state.sessions.get(id)?;
    let mut guard = lock_session(&session)?;

    let (outcome, notice, rejected_kind) = match guard.controller.click(&payload.tile_id) {
        Ok(outcome) => (ClickResult::from(outcome), None, None),
        Err(rejection @ SelectionError::AlreadySelected(kind)) => (
            ClickResult::AlreadySelected,
            Some(rejection.user_message().to_string()),
            Some(kind),
        ),
    };

    let board = guard.controller.snapshot()?;
    Ok(Json(ClickResponse {
        outcome,
        notice,
        rejected_kind,
        board,
        events: guard.drain_events(),
    }))
}

/// POST /api/test-sessions/{id}/reset
pub async fn reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TestSessionResponse>> {
    let session = state.sessions.get(id)?;
    let mut guard = lock_session(&session)?;
    guard.controller.reset()?;

    tracing::info!("Reset test session {}", id);

    Ok(Json(guard.response()?))
}

/// DELETE /api/test-sessions/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    state.sessions.remove(id)?;
    tracing::info!("Discarded test session {}", id);
    Ok(StatusCode::NO_CONTENT)
}

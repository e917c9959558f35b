//! Subject and deck endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use matching_core::Flashcard;

use crate::error::{ApiError, Result};
use crate::models::{FlashcardsResponse, Subject, SubjectListResponse};
use crate::AppState;

/// GET /api/subjects
pub async fn list(State(state): State<AppState>) -> Result<Json<SubjectListResponse>> {
    let provider = state.provider.clone();
    let ids = tokio::task::spawn_blocking(move || provider.subjects())
        .await
        .map_err(|e| ApiError::Internal(format!("subject loader failed: {e}")))??;

    Ok(Json(SubjectListResponse {
        subjects: ids.into_iter().map(Subject::new).collect(),
    }))
}

/// GET /api/subjects/{subject}/flashcards
pub async fn flashcards(
    State(state): State<AppState>,
    Path(subject): Path<String>,
) -> Result<Json<FlashcardsResponse>> {
    let flashcards = load_deck(&state, &subject).await?;
    Ok(Json(FlashcardsResponse {
        subject: Subject::new(subject),
        flashcards,
    }))
}

/// Read a subject's deck off the async runtime.
pub async fn load_deck(state: &AppState, subject: &str) -> Result<Vec<Flashcard>> {
    let provider = state.provider.clone();
    let subject = subject.to_string();
    let deck = tokio::task::spawn_blocking(move || provider.flashcards(&subject))
        .await
        .map_err(|e| ApiError::Internal(format!("deck loader failed: {e}")))??;
    Ok(deck)
}

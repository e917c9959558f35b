//! API request and response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Re-export shared types from matching-core
pub use matching_core::{
    BoardSnapshot, ClickOutcome, EngineEvent, Flashcard, Subject, TestParams, TileKind,
};

// === Subject Types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct SubjectListResponse {
    pub subjects: Vec<Subject>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FlashcardsResponse {
    pub subject: Subject,
    pub flashcards: Vec<Flashcard>,
}

// === Test Session Types ===

/// Start a matching test. Sizes fall back to the configured defaults.
#[derive(Debug, Deserialize)]
pub struct StartTestRequest {
    pub subject: String,
    #[serde(default)]
    pub matching_pairs: Option<usize>,
    #[serde(default)]
    pub distractor_count: Option<usize>,
}

impl StartTestRequest {
    pub fn params(&self, defaults: TestParams) -> TestParams {
        TestParams::new(
            self.matching_pairs.unwrap_or(defaults.matching_pairs),
            self.distractor_count.unwrap_or(defaults.distractor_count),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct ClickRequest {
    pub tile_id: String,
}

/// Board state plus every engine event since the previous response.
#[derive(Debug, Serialize, Deserialize)]
pub struct TestSessionResponse {
    pub session_id: Uuid,
    pub subject: Subject,
    pub params: TestParams,
    pub started_at: DateTime<Utc>,
    pub board: BoardSnapshot,
    pub events: Vec<EngineEvent>,
}

/// Outcome of a click as reported to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickResult {
    Ignored,
    Selected,
    Deselected,
    Matched,
    Mismatched,
    AlreadySelected,
}

impl From<ClickOutcome> for ClickResult {
    fn from(outcome: ClickOutcome) -> Self {
        match outcome {
            ClickOutcome::Ignored => Self::Ignored,
            ClickOutcome::Selected => Self::Selected,
            ClickOutcome::Deselected => Self::Deselected,
            ClickOutcome::Matched => Self::Matched,
            ClickOutcome::Mismatched => Self::Mismatched,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClickResponse {
    pub outcome: ClickResult,
    /// User-facing notice for a rejected selection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected_kind: Option<TileKind>,
    pub board: BoardSnapshot,
    pub events: Vec<EngineEvent>,
}

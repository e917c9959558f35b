//! Core types for the test mode board.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SetupError};

/// A question/answer record from a subject deck.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
}

impl Flashcard {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// A subject identifier paired with its human readable label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub display_name: String,
}

impl Subject {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let display_name = display_name(&id);
        Self { id, display_name }
    }
}

/// Turn a subject identifier like `world_history` into `World history`.
pub fn display_name(subject_id: &str) -> String {
    let spaced = subject_id.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Which column a tile belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Question,
    Answer,
}

impl TileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Question => "question",
            Self::Answer => "answer",
        }
    }
}

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interaction state of a single tile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileState {
    #[default]
    Idle,
    Selected,
    Matched,
    MismatchFlash,
}

/// One clickable unit on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: String,
    pub kind: TileKind,
    pub content: String,
    /// Id of the answer tile this question pairs with. Always `None` for
    /// answers and for distractor questions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_id: Option<String>,
    pub state: TileState,
}

impl Tile {
    pub fn question(id: String, content: String, match_id: Option<String>) -> Self {
        Self {
            id,
            kind: TileKind::Question,
            content,
            match_id,
            state: TileState::Idle,
        }
    }

    pub fn answer(id: String, content: String) -> Self {
        Self {
            id,
            kind: TileKind::Answer,
            content,
            match_id: None,
            state: TileState::Idle,
        }
    }

    pub fn is_distractor(&self) -> bool {
        self.kind == TileKind::Question && self.match_id.is_none()
    }
}

/// Sample sizes for one test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestParams {
    pub matching_pairs: usize,
    pub distractor_count: usize,
}

impl Default for TestParams {
    fn default() -> Self {
        Self {
            matching_pairs: 6,
            distractor_count: 4,
        }
    }
}

impl TestParams {
    pub fn new(matching_pairs: usize, distractor_count: usize) -> Self {
        Self {
            matching_pairs,
            distractor_count,
        }
    }

    /// Number of question tiles on the board, or `None` if the sizes
    /// overflow `usize`.
    pub fn total_questions(&self) -> Option<usize> {
        self.matching_pairs.checked_add(self.distractor_count)
    }

    pub fn validate(&self) -> Result<()> {
        if self.matching_pairs == 0 {
            return Err(SetupError::InvalidParameters(
                "at least one matching pair is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Read-only view of the board handed to renderers and API callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub generation: u64,
    pub questions: Vec<Tile>,
    pub answers: Vec<Tile>,
    pub selected_question: Option<String>,
    pub selected_answer: Option<String>,
    pub locked: bool,
    pub complete: bool,
    pub remaining_pairs: usize,
}

impl BoardSnapshot {
    /// Tiles still on the board, in either column.
    pub fn active_tiles(&self) -> usize {
        self.questions.len() + self.answers.len()
    }

    pub fn tile(&self, id: &str) -> Option<&Tile> {
        self.questions
            .iter()
            .chain(self.answers.iter())
            .find(|tile| tile.id == id)
    }
}

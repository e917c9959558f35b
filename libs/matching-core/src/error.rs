//! Error types for matching-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::TileKind;

/// Result type alias using SetupError.
pub type Result<T> = std::result::Result<T, SetupError>;

/// Errors raised by a data provider while loading subjects or decks.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed data in {path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown subject: {0}")]
    UnknownSubject(String),

    #[error("invalid subject identifier: {0:?}")]
    InvalidSubject(String),
}

/// Errors that prevent a test session from starting.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("data unavailable: {0}")]
    DataUnavailable(#[from] DataError),

    #[error("not enough flashcards: need {required}, deck has {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("invalid test parameters: {0}")]
    InvalidParameters(String),

    #[error("no test has been started")]
    NotStarted,
}

/// Soft rejection of a click. The board is left exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("a {0} tile is already selected")]
    AlreadySelected(TileKind),
}

impl SelectionError {
    /// Notice shown to the player.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::AlreadySelected(TileKind::Question) => {
                "You have already selected a question. Please select an answer."
            }
            Self::AlreadySelected(TileKind::Answer) => {
                "You have already selected an answer. Please select a question."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_display() {
        let error = SetupError::InsufficientData {
            required: 10,
            available: 3,
        };
        assert_eq!(
            error.to_string(),
            "not enough flashcards: need 10, deck has 3"
        );
    }

    #[test]
    fn test_data_error_converts_to_setup_error() {
        let error: SetupError = DataError::UnknownSubject("biology".to_string()).into();
        assert!(matches!(error, SetupError::DataUnavailable(_)));
        assert_eq!(error.to_string(), "data unavailable: unknown subject: biology");
    }

    #[test]
    fn test_already_selected_messages() {
        let question = SelectionError::AlreadySelected(TileKind::Question);
        let answer = SelectionError::AlreadySelected(TileKind::Answer);
        assert!(question.user_message().contains("select an answer"));
        assert!(answer.user_message().contains("select a question"));
        assert_eq!(question.to_string(), "a question tile is already selected");
    }
}

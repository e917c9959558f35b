//! Data providers: where subject lists and decks come from.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::error::DataError;
use crate::types::Flashcard;

/// Source of subjects and their flashcard decks.
pub trait DataProvider: Send + Sync {
    /// Subject identifiers, in display order.
    fn subjects(&self) -> Result<Vec<String>, DataError>;

    /// Full deck for one subject.
    fn flashcards(&self, subject: &str) -> Result<Vec<Flashcard>, DataError>;
}

/// Reads the static layout used by the web client:
///
/// ```text
/// <root>/subjects.json            ["algebra", "world_history"]
/// <root>/flashcards/<subject>.json [{"question": "...", "answer": "..."}]
/// ```
#[derive(Debug, Clone)]
pub struct JsonDirProvider {
    root: PathBuf,
}

impl JsonDirProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn deck_path(&self, subject: &str) -> Result<PathBuf, DataError> {
        validate_subject(subject)?;
        Ok(self.root.join("flashcards").join(format!("{subject}.json")))
    }
}

impl DataProvider for JsonDirProvider {
    fn subjects(&self) -> Result<Vec<String>, DataError> {
        read_json(&self.root.join("subjects.json"))
    }

    fn flashcards(&self, subject: &str) -> Result<Vec<Flashcard>, DataError> {
        let path = self.deck_path(subject)?;
        match read_json(&path) {
            Err(DataError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                Err(DataError::UnknownSubject(subject.to_string()))
            }
            other => other,
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DataError> {
    let content = fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| DataError::Format {
        path: path.to_path_buf(),
        source,
    })
}

/// Subject ids become file names, so anything that could escape the data
/// directory is refused.
fn validate_subject(subject: &str) -> Result<(), DataError> {
    let invalid = subject.is_empty()
        || subject.contains(['/', '\\'])
        || subject.contains("..")
        || subject.chars().any(char::is_control);
    if invalid {
        return Err(DataError::InvalidSubject(subject.to_string()));
    }
    Ok(())
}

/// Provider backed by in-memory decks.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    subjects: Vec<String>,
    decks: HashMap<String, Vec<Flashcard>>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deck(mut self, subject: impl Into<String>, deck: Vec<Flashcard>) -> Self {
        let subject = subject.into();
        if !self.decks.contains_key(&subject) {
            self.subjects.push(subject.clone());
        }
        self.decks.insert(subject, deck);
        self
    }
}

impl DataProvider for InMemoryProvider {
    fn subjects(&self) -> Result<Vec<String>, DataError> {
        Ok(self.subjects.clone())
    }

    fn flashcards(&self, subject: &str) -> Result<Vec<Flashcard>, DataError> {
        self.decks
            .get(subject)
            .cloned()
            .ok_or_else(|| DataError::UnknownSubject(subject.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn data_dir() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("flashcards")).unwrap();
        fs::write(
            dir.path().join("subjects.json"),
            r#"["algebra", "world_history"]"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("flashcards/algebra.json"),
            r#"[{"question": "x + 1 = 2?", "answer": "x = 1"}]"#,
        )
        .unwrap();
        fs::write(dir.path().join("flashcards/world_history.json"), "not json").unwrap();
        dir
    }

    #[test]
    fn test_reads_subjects_and_deck() {
        let dir = data_dir();
        let provider = JsonDirProvider::new(dir.path());
        assert_eq!(
            provider.subjects().unwrap(),
            vec!["algebra".to_string(), "world_history".to_string()]
        );
        assert_eq!(
            provider.flashcards("algebra").unwrap(),
            vec![Flashcard::new("x + 1 = 2?", "x = 1")]
        );
    }

    #[test]
    fn test_missing_deck_is_unknown_subject() {
        let dir = data_dir();
        let provider = JsonDirProvider::new(dir.path());
        let err = provider.flashcards("chemistry").unwrap_err();
        assert!(matches!(err, DataError::UnknownSubject(s) if s == "chemistry"));
    }

    #[test]
    fn test_malformed_deck_is_format_error() {
        let dir = data_dir();
        let provider = JsonDirProvider::new(dir.path());
        let err = provider.flashcards("world_history").unwrap_err();
        assert!(matches!(err, DataError::Format { .. }));
    }

    #[test]
    fn test_missing_subject_list_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let provider = JsonDirProvider::new(dir.path());
        assert!(matches!(provider.subjects(), Err(DataError::Io { .. })));
    }

    #[test]
    fn test_path_traversal_rejected() {
        let dir = data_dir();
        let provider = JsonDirProvider::new(dir.path());
        for subject in ["../secrets", "a/b", "a\\b", ""] {
            let err = provider.flashcards(subject).unwrap_err();
            assert!(matches!(err, DataError::InvalidSubject(_)), "{subject:?}");
        }
    }

    #[test]
    fn test_in_memory_provider() {
        let provider = InMemoryProvider::new()
            .with_deck("rust", vec![Flashcard::new("fn?", "function")])
            .with_deck("go", vec![]);
        assert_eq!(provider.subjects().unwrap(), vec!["rust", "go"]);
        assert_eq!(provider.flashcards("rust").unwrap().len(), 1);
        assert!(matches!(
            provider.flashcards("zig"),
            Err(DataError::UnknownSubject(_))
        ));
    }
}

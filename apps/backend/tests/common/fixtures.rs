//! Test fixtures and factory functions for creating test data.

use std::fs;
use std::path::Path;

use serde_json::json;

/// Generate a deck with a specified number of cards.
///
/// Every third answer spans two lines so line-break handling is exercised.
pub fn sample_deck(num_cards: usize) -> serde_json::Value {
    let cards: Vec<_> = (0..num_cards)
        .map(|i| {
            let answer = if i % 3 == 0 {
                format!("Answer {}.\nSee chapter {}.", i + 1, i + 1)
            } else {
                format!("Answer {}.", i + 1)
            };
            json!({ "question": format!("Question {}?", i + 1), "answer": answer })
        })
        .collect();
    json!(cards)
}

/// Write a data directory in the layout the service reads.
///
/// Subjects:
/// - `algebra`: 12 cards
/// - `world_history`: exactly 10 cards
/// - `tiny`: 3 cards, too small for a default test
/// - `broken`: listed, but its deck file is not valid JSON
pub fn write_data_dir(root: &Path) {
    fs::create_dir_all(root.join("flashcards")).expect("Failed to create flashcards dir");
    fs::write(
        root.join("subjects.json"),
        json!(["algebra", "world_history", "tiny", "broken"]).to_string(),
    )
    .expect("Failed to write subjects.json");

    for (subject, size) in [("algebra", 12), ("world_history", 10), ("tiny", 3)] {
        fs::write(
            root.join("flashcards").join(format!("{subject}.json")),
            sample_deck(size).to_string(),
        )
        .expect("Failed to write deck");
    }
    fs::write(root.join("flashcards/broken.json"), "{ not json")
        .expect("Failed to write broken deck");
}

/// Create a start test request body.
pub fn start_test_request(
    subject: &str,
    matching_pairs: Option<usize>,
    distractor_count: Option<usize>,
) -> serde_json::Value {
    let mut body = json!({ "subject": subject });
    if let Some(pairs) = matching_pairs {
        body["matching_pairs"] = json!(pairs);
    }
    if let Some(distractors) = distractor_count {
        body["distractor_count"] = json!(distractors);
    }
    body
}

/// Create a click request body.
pub fn click_request(tile_id: &str) -> serde_json::Value {
    json!({ "tile_id": tile_id })
}

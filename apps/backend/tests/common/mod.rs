//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext for running the service over a temporary data directory
//! - Helpers for driving a test session through the API

#![allow(dead_code)]

pub mod fixtures;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::Router;
use axum_test::TestServer;
use serde_json::Value;
use tempfile::TempDir;

use flashcard_study_backend::config::Config;
use flashcard_study_backend::{build_router, AppState};
use matching_core::JsonDirProvider;

/// Settle delay used by the API tests.
pub const TEST_SETTLE_DELAY: Duration = Duration::from_millis(20);

/// Test context owning a temporary data directory and the app under test.
pub struct TestContext {
    pub state: AppState,
    app: Router,
    _data_dir: TempDir,
}

impl TestContext {
    /// Create a new test context with the fixture subjects.
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    /// Create a test context, letting the caller adjust the config first.
    pub fn with_config(configure: impl FnOnce(&mut Config)) -> Self {
        let data_dir = tempfile::tempdir().expect("Failed to create temp dir");
        fixtures::write_data_dir(data_dir.path());

        let mut config = Config {
            data_dir: data_dir.path().to_path_buf(),
            settle_delay: TEST_SETTLE_DELAY,
            ..Config::default()
        };
        configure(&mut config);
        let provider = JsonDirProvider::new(data_dir.path());
        let state = AppState::new(config, Arc::new(provider));
        let app = build_router(state.clone());

        Self {
            state,
            app,
            _data_dir: data_dir,
        }
    }

    /// Get the router for testing.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(self.router()).unwrap()
    }
}

/// Start a test on `subject` with default sizes and return the response body.
pub async fn start_test(server: &TestServer, subject: &str) -> Value {
    let response = server
        .post("/api/test-sessions")
        .json(&fixtures::start_test_request(subject, None, None))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

/// Click a tile and return the response body.
pub async fn click(server: &TestServer, session_id: &str, tile_id: &str) -> Value {
    let response = server
        .post(&format!("/api/test-sessions/{session_id}/click"))
        .json(&fixtures::click_request(tile_id))
        .await;
    response.assert_status_ok();
    response.json()
}

/// Fetch the current state of a session.
pub async fn fetch(server: &TestServer, session_id: &str) -> Value {
    let response = server
        .get(&format!("/api/test-sessions/{session_id}"))
        .await;
    response.assert_status_ok();
    response.json()
}

/// Wait long enough for a pending settle to be applied.
pub async fn wait_for_settle() {
    tokio::time::sleep(TEST_SETTLE_DELAY * 5).await;
}

/// Question tiles that have a partner, as (question id, answer id).
pub fn matching_pairs(board: &Value) -> Vec<(String, String)> {
    board["questions"]
        .as_array()
        .expect("questions array")
        .iter()
        .filter_map(|q| {
            let answer = q.get("match_id")?.as_str()?;
            Some((q["id"].as_str()?.to_string(), answer.to_string()))
        })
        .collect()
}

/// Question tiles without a partner.
pub fn distractor_ids(board: &Value) -> Vec<String> {
    board["questions"]
        .as_array()
        .expect("questions array")
        .iter()
        .filter(|q| q.get("match_id").is_none())
        .filter_map(|q| q["id"].as_str().map(String::from))
        .collect()
}

/// Count events of one `type` in a response.
pub fn count_events(body: &Value, event_type: &str) -> usize {
    body["events"]
        .as_array()
        .map(|events| {
            events
                .iter()
                .filter(|e| e["type"] == event_type)
                .count()
        })
        .unwrap_or(0)
}

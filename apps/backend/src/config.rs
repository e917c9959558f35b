//! Service configuration read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use matching_core::{SetupError, TestParams, DEFAULT_LINE_BREAK, DEFAULT_SETTLE_DELAY};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a non-negative integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("invalid default test size: {0}")]
    InvalidDefaults(#[source] SetupError),

    #[error("MAX_SESSIONS must be at least 1")]
    NoSessionCapacity,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Directory holding `subjects.json` and `flashcards/`.
    pub data_dir: PathBuf,
    pub settle_delay: Duration,
    pub default_params: TestParams,
    pub line_break: String,
    /// Sessions idle for longer than this are evicted.
    pub session_ttl: Duration,
    pub max_sessions: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            data_dir: PathBuf::from("data"),
            settle_delay: DEFAULT_SETTLE_DELAY,
            default_params: TestParams::default(),
            line_break: DEFAULT_LINE_BREAK.to_string(),
            session_ttl: Duration::from_secs(60 * 60),
            max_sessions: 1000,
        }
    }
}

impl Config {
    /// Build config from environment variables, falling back to defaults.
    ///
    /// Recognised vars:
    /// - HOST, PORT: bind address
    /// - DATA_DIR: subject and deck JSON files
    /// - SETTLE_DELAY_MS: pause before a matched pair is removed or a
    ///   mismatched pair reverts
    /// - MATCHING_PAIRS, DISTRACTOR_COUNT: default test size
    /// - LINE_BREAK: token replacing newlines in answer tiles
    /// - SESSION_TTL_MINUTES: idle time before a test session is evicted
    /// - MAX_SESSIONS: cap on live test sessions
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = std::env::var("HOST").unwrap_or(defaults.host);
        let port = parse_var("PORT", defaults.port)?;
        let data_dir = std::env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);
        let settle_delay = parse_var("SETTLE_DELAY_MS", defaults.settle_delay.as_millis() as u64)
            .map(Duration::from_millis)?;
        let default_params = TestParams::new(
            parse_var("MATCHING_PAIRS", defaults.default_params.matching_pairs)?,
            parse_var("DISTRACTOR_COUNT", defaults.default_params.distractor_count)?,
        );
        let line_break = std::env::var("LINE_BREAK").unwrap_or(defaults.line_break);
        let session_ttl = parse_var("SESSION_TTL_MINUTES", defaults.session_ttl.as_secs() / 60)
            .map(|minutes| Duration::from_secs(minutes.saturating_mul(60)))?;
        let max_sessions = parse_var("MAX_SESSIONS", defaults.max_sessions)?;

        let config = Self {
            host,
            port,
            data_dir,
            settle_delay,
            default_params,
            line_break,
            session_ttl,
            max_sessions,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make every test request fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.default_params
            .validate()
            .map_err(ConfigError::InvalidDefaults)?;
        if self.default_params.total_questions().is_none() {
            return Err(ConfigError::InvalidDefaults(SetupError::InvalidParameters(
                "matching pairs plus distractors overflows".to_string(),
            )));
        }
        if self.max_sessions == 0 {
            return Err(ConfigError::NoSessionCapacity);
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber {
                name,
                value: value.clone(),
            }),
        Err(_) => Ok(default),
    }
}

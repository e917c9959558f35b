//! Test mode engine for the study flashcards app.
//!
//! Provides:
//! - Deck sampling into matching pairs and distractors
//! - Tile building with independent column shuffles
//! - The click-to-match state machine with cancellable settle delays
//! - A session controller tying the pieces together
//! - Collaborator traits for data providers, renderers and schedulers

pub mod engine;
pub mod error;
pub mod provider;
pub mod render;
pub mod sampler;
pub mod scheduler;
pub mod session;
pub mod tiles;
pub mod types;

pub use engine::{ClickOutcome, MatchEngine, SettleOutcome, DEFAULT_SETTLE_DELAY};
pub use error::{DataError, Result, SelectionError, SetupError};
pub use provider::{DataProvider, InMemoryProvider, JsonDirProvider};
pub use render::{EngineEvent, EventLog, Renderer};
pub use sampler::{sample, Sample};
pub use scheduler::{ManualScheduler, SettleScheduler, SettleTicket};
pub use session::SessionController;
pub use tiles::{TileSet, TileSetBuilder, DEFAULT_LINE_BREAK};
pub use types::{
    display_name, BoardSnapshot, Flashcard, Subject, TestParams, Tile, TileKind, TileState,
};

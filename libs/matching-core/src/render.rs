//! Output side of the engine: events a renderer consumes.

use serde::{Deserialize, Serialize};

use crate::types::{Tile, TileKind, TileState};

/// Notification emitted after every engine transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    SessionStarted { generation: u64 },
    TileRendered { tile: Tile },
    TileStateChanged { tile_id: String, state: TileState },
    /// A matched tile left the board.
    TileRetired { tile_id: String },
    SelectionRejected { kind: TileKind },
    SessionComplete,
    SessionCleared,
}

/// Sink for engine events. Implementations draw; they never touch engine state.
pub trait Renderer {
    fn render(&mut self, event: EngineEvent);
}

/// Renderer that keeps events until someone drains them.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<EngineEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[EngineEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// Count events matching a predicate.
    pub fn count(&self, predicate: impl Fn(&EngineEvent) -> bool) -> usize {
        self.events.iter().filter(|event| predicate(event)).count()
    }
}

impl Renderer for EventLog {
    fn render(&mut self, event: EngineEvent) {
        self.events.push(event);
    }
}

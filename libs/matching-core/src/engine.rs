//! Click-to-match state machine.
//!
//! Per tile: `Idle -> Selected -> {Matched | MismatchFlash -> Idle}`.
//! `Matched` is terminal and the tile leaves the board once its settle
//! ticket comes back. While a pair is being settled the board is locked and
//! every click is ignored.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SelectionError;
use crate::render::{EngineEvent, Renderer};
use crate::scheduler::{ManualScheduler, SettleScheduler, SettleTicket};
use crate::tiles::TileSet;
use crate::types::{BoardSnapshot, Tile, TileKind, TileState};

/// Pause between evaluating a pair and retiring or reverting it.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(500);

/// What a click did to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickOutcome {
    /// Unknown tile, matched tile, locked board, or no session.
    Ignored,
    Selected,
    Deselected,
    /// Pair evaluated as a match; retirement is pending.
    Matched,
    /// Pair evaluated as a mismatch; revert is pending.
    Mismatched,
}

/// Result of feeding a settle ticket back to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettleOutcome {
    /// Ticket belongs to a superseded session or pairing.
    Stale,
    Retired { complete: bool },
    Reverted,
}

#[derive(Debug)]
struct PendingPair {
    ticket: SettleTicket,
    question_id: String,
    answer_id: String,
    matched: bool,
}

#[derive(Debug)]
struct Session {
    generation: u64,
    questions: Vec<Tile>,
    answers: Vec<Tile>,
    question_slot: Option<String>,
    answer_slot: Option<String>,
    locked: bool,
    pending: Option<PendingPair>,
    complete: bool,
}

impl Session {
    fn column(&self, kind: TileKind) -> &Vec<Tile> {
        match kind {
            TileKind::Question => &self.questions,
            TileKind::Answer => &self.answers,
        }
    }

    fn column_mut(&mut self, kind: TileKind) -> &mut Vec<Tile> {
        match kind {
            TileKind::Question => &mut self.questions,
            TileKind::Answer => &mut self.answers,
        }
    }

    fn slot_mut(&mut self, kind: TileKind) -> &mut Option<String> {
        match kind {
            TileKind::Question => &mut self.question_slot,
            TileKind::Answer => &mut self.answer_slot,
        }
    }

    fn locate(&self, id: &str) -> Option<(TileKind, usize)> {
        [TileKind::Question, TileKind::Answer]
            .into_iter()
            .find_map(|kind| {
                self.column(kind)
                    .iter()
                    .position(|tile| tile.id == id)
                    .map(|index| (kind, index))
            })
    }

    fn tile(&self, id: &str) -> Option<&Tile> {
        let (kind, index) = self.locate(id)?;
        self.column(kind).get(index)
    }

    fn tile_mut(&mut self, id: &str) -> Option<&mut Tile> {
        let (kind, index) = self.locate(id)?;
        self.column_mut(kind).get_mut(index)
    }

    fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            generation: self.generation,
            questions: self.questions.clone(),
            answers: self.answers.clone(),
            selected_question: self.question_slot.clone(),
            selected_answer: self.answer_slot.clone(),
            locked: self.locked,
            complete: self.complete,
            remaining_pairs: self.answers.len(),
        }
    }
}

/// Owns the live board and processes clicks and settle tickets.
pub struct MatchEngine<R, S> {
    renderer: R,
    scheduler: S,
    settle_delay: Duration,
    last_generation: u64,
    last_pairing: u64,
    session: Option<Session>,
}

impl<R: Renderer, S: SettleScheduler> MatchEngine<R, S> {
    pub fn new(renderer: R, scheduler: S) -> Self {
        Self {
            renderer,
            scheduler,
            settle_delay: DEFAULT_SETTLE_DELAY,
            last_generation: 0,
            last_pairing: 0,
            session: None,
        }
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Replace whatever is on the board with a fresh session.
    ///
    /// Returns the new generation. Tickets from earlier generations become
    /// stale.
    pub fn load(&mut self, tiles: TileSet) -> u64 {
        if self.session.is_some() {
            self.reset_session();
        }

        self.last_generation += 1;
        let generation = self.last_generation;
        let TileSet { questions, answers } = tiles;

        self.renderer.render(EngineEvent::SessionStarted { generation });
        for tile in questions.iter().chain(answers.iter()) {
            self.renderer
                .render(EngineEvent::TileRendered { tile: tile.clone() });
        }

        tracing::debug!(
            generation,
            questions = questions.len(),
            answers = answers.len(),
            "loaded board"
        );

        self.session = Some(Session {
            generation,
            questions,
            answers,
            question_slot: None,
            answer_slot: None,
            locked: false,
            pending: None,
            complete: false,
        });
        generation
    }

    /// Discard the board, both slots and the lock. Safe at any point,
    /// including while a settle ticket is outstanding.
    pub fn reset_session(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::debug!(
                generation = session.generation,
                pending = session.pending.is_some(),
                "session discarded"
            );
            self.renderer.render(EngineEvent::SessionCleared);
        }
    }

    /// Handle a click on the tile with the given id.
    pub fn on_tile_clicked(&mut self, tile_id: &str) -> Result<ClickOutcome, SelectionError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(ClickOutcome::Ignored);
        };
        if session.locked {
            tracing::trace!(tile_id, "click ignored while locked");
            return Ok(ClickOutcome::Ignored);
        }
        let Some((kind, index)) = session.locate(tile_id) else {
            return Ok(ClickOutcome::Ignored);
        };

        let state = session.column(kind)[index].state;
        match state {
            TileState::Matched | TileState::MismatchFlash => return Ok(ClickOutcome::Ignored),
            TileState::Selected => {
                session.column_mut(kind)[index].state = TileState::Idle;
                *session.slot_mut(kind) = None;
                self.renderer.render(EngineEvent::TileStateChanged {
                    tile_id: tile_id.to_string(),
                    state: TileState::Idle,
                });
                return Ok(ClickOutcome::Deselected);
            }
            TileState::Idle => {}
        }

        if session.slot_mut(kind).is_some() {
            self.renderer.render(EngineEvent::SelectionRejected { kind });
            return Err(SelectionError::AlreadySelected(kind));
        }

        session.column_mut(kind)[index].state = TileState::Selected;
        *session.slot_mut(kind) = Some(tile_id.to_string());
        self.renderer.render(EngineEvent::TileStateChanged {
            tile_id: tile_id.to_string(),
            state: TileState::Selected,
        });

        let (Some(question_id), Some(answer_id)) =
            (session.question_slot.clone(), session.answer_slot.clone())
        else {
            return Ok(ClickOutcome::Selected);
        };

        session.locked = true;
        let matched = session
            .tile(&question_id)
            .and_then(|question| question.match_id.as_deref())
            == Some(answer_id.as_str());
        let state = if matched {
            TileState::Matched
        } else {
            TileState::MismatchFlash
        };

        for id in [&question_id, &answer_id] {
            if let Some(tile) = session.tile_mut(id) {
                tile.state = state;
            }
            self.renderer.render(EngineEvent::TileStateChanged {
                tile_id: id.clone(),
                state,
            });
        }

        self.last_pairing += 1;
        let ticket = SettleTicket {
            generation: session.generation,
            pairing: self.last_pairing,
        };
        tracing::debug!(%question_id, %answer_id, matched, pairing = ticket.pairing, "pair evaluated");
        session.pending = Some(PendingPair {
            ticket,
            question_id,
            answer_id,
            matched,
        });
        self.scheduler.schedule(self.settle_delay, ticket);

        Ok(if matched {
            ClickOutcome::Matched
        } else {
            ClickOutcome::Mismatched
        })
    }

    /// Finish the pending pair named by `ticket`.
    ///
    /// A ticket that does not name the live session's pending pair is
    /// dropped without touching the board.
    pub fn settle(&mut self, ticket: SettleTicket) -> SettleOutcome {
        let Some(session) = self.session.as_mut() else {
            tracing::debug!(?ticket, "stale settle ticket: no session");
            return SettleOutcome::Stale;
        };
        if session.generation != ticket.generation
            || session.pending.as_ref().map(|pending| pending.ticket) != Some(ticket)
        {
            tracing::debug!(?ticket, generation = session.generation, "stale settle ticket");
            return SettleOutcome::Stale;
        }
        let Some(pending) = session.pending.take() else {
            return SettleOutcome::Stale;
        };

        session.question_slot = None;
        session.answer_slot = None;
        session.locked = false;

        if pending.matched {
            session.questions.retain(|tile| tile.id != pending.question_id);
            session.answers.retain(|tile| tile.id != pending.answer_id);
            for tile_id in [pending.question_id, pending.answer_id] {
                self.renderer.render(EngineEvent::TileRetired { tile_id });
            }

            // Distractors never have a partner, so the board is done once
            // every answer has been retired.
            let newly_complete = !session.complete && session.answers.is_empty();
            if newly_complete {
                session.complete = true;
                tracing::debug!(generation = session.generation, "session complete");
                self.renderer.render(EngineEvent::SessionComplete);
            }
            SettleOutcome::Retired {
                complete: session.complete,
            }
        } else {
            for tile_id in [pending.question_id, pending.answer_id] {
                if let Some(tile) = session.tile_mut(&tile_id) {
                    tile.state = TileState::Idle;
                }
                self.renderer.render(EngineEvent::TileStateChanged {
                    tile_id,
                    state: TileState::Idle,
                });
            }
            SettleOutcome::Reverted
        }
    }

    pub fn snapshot(&self) -> Option<BoardSnapshot> {
        self.session.as_ref().map(Session::snapshot)
    }

    pub fn generation(&self) -> Option<u64> {
        self.session.as_ref().map(|session| session.generation)
    }

    pub fn is_locked(&self) -> bool {
        self.session.as_ref().is_some_and(|session| session.locked)
    }

    pub fn is_complete(&self) -> bool {
        self.session.as_ref().is_some_and(|session| session.complete)
    }

    /// Tiles still on the board (matched tiles awaiting retirement included).
    pub fn active_tiles(&self) -> usize {
        self.session
            .as_ref()
            .map_or(0, |session| session.questions.len() + session.answers.len())
    }
}

impl<R: Renderer> MatchEngine<R, ManualScheduler> {
    /// Advance the manual clock and settle every ticket that came due.
    pub fn advance(&mut self, by: Duration) -> Vec<SettleOutcome> {
        let due = self.scheduler.advance(by);
        due.into_iter().map(|ticket| self.settle(ticket)).collect()
    }
}
